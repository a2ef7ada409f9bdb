//! Headless control wrapper for testing
//!
//! Runs a real [`TerminalControl`] on a real `calloop` loop against a
//! [`FakeCore`] and a [`TestHost`]. Core and host are shared through
//! `Rc<RefCell<_>>` so tests can drive and inspect them while the control
//! holds its own handle.

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{anyhow, Context};
use calloop::EventLoop;
use control::{ControlConfig, DpiScale, HostSurface, Rgb, Size, TerminalControl, Thickness};

use crate::fake_core::FakeCore;

/// Dispatch rounds before a harness gives up waiting
const MAX_DISPATCH_ROUNDS: usize = 16;

/// Host surface that records what the control writes to it
#[derive(Debug, Clone)]
pub struct TestHost {
    pub dpi: DpiScale,
    pub size: Size,
    pub presented: bool,
    margins: Vec<Thickness>,
    background: Option<Rgb>,
}

impl TestHost {
    pub fn new(size: Size) -> Self {
        Self {
            dpi: DpiScale::default(),
            size,
            presented: true,
            margins: Vec::new(),
            background: None,
        }
    }

    /// Most recently applied margin
    pub fn margin(&self) -> Option<Thickness> {
        self.margins.last().copied()
    }

    /// How many times a margin was applied
    pub fn margin_count(&self) -> usize {
        self.margins.len()
    }

    pub fn background(&self) -> Option<Rgb> {
        self.background
    }
}

impl HostSurface for TestHost {
    fn dpi_scale(&self) -> DpiScale {
        self.dpi
    }

    fn actual_size(&self) -> Size {
        self.size
    }

    fn is_presented(&self) -> bool {
        self.presented
    }

    fn set_terminal_margin(&mut self, margin: Thickness) {
        self.margins.push(margin);
    }

    fn set_background(&mut self, color: Rgb) {
        self.background = Some(color);
    }
}

pub type SharedCore = Rc<RefCell<FakeCore>>;
pub type SharedHost = Rc<RefCell<TestHost>>;
pub type TestControl = TerminalControl<SharedCore, SharedHost>;

/// A control on its own event loop
pub struct ControlHarness {
    event_loop: EventLoop<'static, TestControl>,
    pub control: TestControl,
    pub core: SharedCore,
    pub host: SharedHost,
}

impl ControlHarness {
    pub fn new(config: ControlConfig, host: TestHost) -> anyhow::Result<Self> {
        Self::with_core(FakeCore::new(), config, host)
    }

    pub fn with_core(core: FakeCore, config: ControlConfig, host: TestHost) -> anyhow::Result<Self> {
        let event_loop: EventLoop<'static, TestControl> =
            EventLoop::try_new().context("failed to create event loop")?;

        let core = Rc::new(RefCell::new(core));
        let host = Rc::new(RefCell::new(host));
        let control = TerminalControl::new(core.clone(), host.clone(), config, &event_loop.handle())?;

        Ok(Self {
            event_loop,
            control,
            core,
            host,
        })
    }

    /// Run queued UI work and core notifications until nothing is left
    pub fn pump(&mut self) -> anyhow::Result<()> {
        for _ in 0..MAX_DISPATCH_ROUNDS {
            self.event_loop
                .dispatch(Some(Duration::ZERO), &mut self.control)
                .context("dispatch failed")?;
        }
        Ok(())
    }

    /// Drive a future to completion on the control's loop
    pub fn block_on<F>(&mut self, future: F) -> anyhow::Result<F::Output>
    where
        F: Future + 'static,
        F::Output: 'static,
    {
        let (executor, scheduler) =
            calloop::futures::executor::<F::Output>().context("failed to create executor")?;

        let slot: Rc<RefCell<Option<F::Output>>> = Rc::new(RefCell::new(None));
        let sink = slot.clone();
        let token = self
            .event_loop
            .handle()
            .insert_source(executor, move |output, _, _| {
                *sink.borrow_mut() = Some(output);
            })
            .map_err(|e| anyhow!("failed to insert executor: {}", e.error))?;

        scheduler
            .schedule(future)
            .map_err(|_| anyhow!("executor destroyed before scheduling"))?;

        for _ in 0..MAX_DISPATCH_ROUNDS {
            self.event_loop
                .dispatch(Some(Duration::ZERO), &mut self.control)
                .context("dispatch failed")?;
            if slot.borrow().is_some() {
                break;
            }
        }

        self.event_loop.handle().remove(token);
        let output = slot.borrow_mut().take();
        output.ok_or_else(|| anyhow!("future did not complete"))
    }
}
