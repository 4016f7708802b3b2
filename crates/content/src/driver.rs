//! Cooperative tick driver.
//!
//! Hosts without an async runtime advance a loading future once per tick
//! (frame, update) and cap how many ticks they grant.

use std::future::Future;
use std::task::{Context, Poll};

use futures::FutureExt;
use futures::future::LocalBoxFuture;

use crate::error::DriverError;

/// Outcome of one [`TickDriver::advance`].
#[derive(Debug, PartialEq, Eq)]
pub enum Tick<T> {
	Pending,
	Ready(T),
	/// The output was already taken by an earlier tick.
	Finished,
}

pub struct TickDriver<'a, T> {
	future: Option<LocalBoxFuture<'a, T>>,
	ticks: u64,
}

impl<'a, T> TickDriver<'a, T> {
	pub fn new(future: impl Future<Output = T> + 'a) -> Self {
		Self {
			future: Some(future.boxed_local()),
			ticks: 0,
		}
	}

	/// Polls the future once, without registering for wakeups.
	pub fn advance(&mut self) -> Tick<T> {
		let Some(future) = self.future.as_mut() else {
			return Tick::Finished;
		};

		self.ticks += 1;
		let mut cx = Context::from_waker(futures::task::noop_waker_ref());
		match future.as_mut().poll(&mut cx) {
			Poll::Ready(output) => {
				self.future = None;
				tracing::trace!(ticks = self.ticks, "driver.ready");
				Tick::Ready(output)
			}
			Poll::Pending => Tick::Pending,
		}
	}

	/// Advances until the future completes or `max_ticks` more ticks were spent.
	pub fn run_for(&mut self, max_ticks: u64) -> Result<T, DriverError> {
		for _ in 0..max_ticks {
			match self.advance() {
				Tick::Ready(output) => return Ok(output),
				Tick::Finished => return Err(DriverError::Finished),
				Tick::Pending => {}
			}
		}
		if self.is_finished() {
			return Err(DriverError::Finished);
		}
		tracing::warn!(ticks = self.ticks, max_ticks, "driver.out_of_ticks");
		Err(DriverError::OutOfTicks { ticks: max_ticks })
	}

	/// Total ticks spent polling.
	pub fn ticks(&self) -> u64 {
		self.ticks
	}

	pub fn is_finished(&self) -> bool {
		self.future.is_none()
	}
}

#[cfg(test)]
mod tests {
	use std::pin::Pin;

	use pretty_assertions::assert_eq;

	use super::*;

	/// Pending `remaining` times, then ready.
	struct Countdown {
		remaining: u32,
	}

	impl Future for Countdown {
		type Output = &'static str;

		fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
			if self.remaining == 0 {
				return Poll::Ready("done");
			}
			self.remaining -= 1;
			cx.waker().wake_by_ref();
			Poll::Pending
		}
	}

	#[test]
	fn advances_one_poll_per_tick() {
		let mut driver = TickDriver::new(Countdown { remaining: 2 });
		assert_eq!(driver.advance(), Tick::Pending);
		assert_eq!(driver.advance(), Tick::Pending);
		assert_eq!(driver.advance(), Tick::Ready("done"));
		assert_eq!(driver.advance(), Tick::Finished);
		assert_eq!(driver.ticks(), 3);
	}

	#[test]
	fn budget_exhaustion_is_an_error() {
		let mut driver = TickDriver::new(Countdown { remaining: 10 });
		assert_eq!(driver.run_for(4), Err(DriverError::OutOfTicks { ticks: 4 }));
		assert!(!driver.is_finished());

		// the future keeps its progress across budgets
		assert_eq!(driver.run_for(7), Ok("done"));
		assert_eq!(driver.ticks(), 11);
		assert_eq!(driver.run_for(1), Err(DriverError::Finished));
	}

	#[test]
	fn async_blocks_complete_without_a_runtime() {
		let mut driver = TickDriver::new(async {
			Countdown { remaining: 1 }.await;
			Countdown { remaining: 1 }.await
		});
		assert_eq!(driver.run_for(3), Ok("done"));
	}
}
