//! Event text banner requests.
//!
//! The banner controller itself lives in the host UI; content only enqueues
//! requests through an [`EventTextSink`].

use std::collections::VecDeque;

use parking_lot::Mutex;

/// Linear RGBA color, components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
	pub r: f32,
	pub g: f32,
	pub b: f32,
	pub a: f32,
}

impl Color {
	pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
	pub const CYAN: Color = Color::rgb(0.0, 1.0, 1.0);

	pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Returns `(hue, saturation, value)`, each in `0.0..=1.0`.
	pub fn to_hsv(self) -> (f32, f32, f32) {
		let max = self.r.max(self.g).max(self.b);
		let min = self.r.min(self.g).min(self.b);
		let delta = max - min;

		let hue = if delta <= f32::EPSILON {
			0.0
		} else if max == self.r {
			((self.g - self.b) / delta).rem_euclid(6.0)
		} else if max == self.g {
			(self.b - self.r) / delta + 2.0
		} else {
			(self.r - self.g) / delta + 4.0
		};
		let saturation = if max <= f32::EPSILON { 0.0 } else { delta / max };

		(hue / 6.0, saturation, max)
	}

	pub fn from_hsv(hue: f32, saturation: f32, value: f32) -> Self {
		let h = hue.rem_euclid(1.0) * 6.0;
		let c = value * saturation;
		let x = c * (1.0 - ((h % 2.0) - 1.0).abs());
		let m = value - c;

		let (r, g, b) = match h as u32 {
			0 => (c, x, 0.0),
			1 => (x, c, 0.0),
			2 => (0.0, c, x),
			3 => (0.0, x, c),
			4 => (x, 0.0, c),
			_ => (c, 0.0, x),
		};
		Self::rgb(r + m, g + m, b + m)
	}
}

/// One banner to display.
#[derive(Debug, Clone, PartialEq)]
pub struct EventTextRequest {
	/// Localization token of the message.
	pub token: String,
	pub color: Color,
	/// Total display time in seconds.
	pub duration: f32,
	/// Behavior state replacing the default fade in, wait, fade out sequence.
	pub custom_state: Option<String>,
	pub custom_font: Option<String>,
}

impl EventTextRequest {
	pub fn new(token: impl Into<String>, color: Color, duration: f32) -> Self {
		Self {
			token: token.into(),
			color,
			duration,
			custom_state: None,
			custom_font: None,
		}
	}

	/// Outline color contrasting with [`color`](Self::color): saturation and
	/// value shift by half, down for light colors and up for dark ones.
	pub fn outline_color(&self) -> Color {
		let (hue, saturation, value) = self.color.to_hsv();
		let shift = if value > 0.5 { -0.5 } else { 0.5 };
		Color::from_hsv(hue, (saturation + shift).clamp(0.0, 1.0), (value + shift).clamp(0.0, 1.0))
	}

	/// Duration of the first state entered: the whole duration for a custom
	/// state, a third otherwise (fade in, wait and fade out share it).
	pub fn phase_duration(&self) -> f32 {
		match self.custom_state {
			Some(_) => self.duration,
			None => self.duration / 3.0,
		}
	}
}

/// UI collaborator accepting banner requests.
pub trait EventTextSink: Send + Sync {
	fn enqueue(&self, request: EventTextRequest);
}

/// FIFO sink for hosts that drain requests on their own schedule.
#[derive(Debug, Default)]
pub struct EventTextQueue {
	requests: Mutex<VecDeque<EventTextRequest>>,
}

impl EventTextQueue {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn pop(&self) -> Option<EventTextRequest> {
		self.requests.lock().pop_front()
	}

	pub fn len(&self) -> usize {
		self.requests.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl EventTextSink for EventTextQueue {
	fn enqueue(&self, request: EventTextRequest) {
		tracing::trace!(token = %request.token, duration = request.duration, "event_text.enqueue");
		self.requests.lock().push_back(request);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn approx(a: Color, b: Color) -> bool {
		[(a.r, b.r), (a.g, b.g), (a.b, b.b)].iter().all(|(x, y)| (x - y).abs() < 1e-4)
	}

	#[test]
	fn outline_darkens_light_colors() {
		let request = EventTextRequest::new("EVENT_TEST", Color::CYAN, 15.0);
		// cyan: s = 1, v = 1 -> s = 0.5, v = 0.5
		assert!(approx(request.outline_color(), Color::rgb(0.25, 0.5, 0.5)));
	}

	#[test]
	fn outline_lightens_dark_colors() {
		let request = EventTextRequest::new("EVENT_DARK", Color::rgb(0.0, 0.0, 0.0), 3.0);
		assert!(approx(request.outline_color(), Color::rgb(0.5, 0.25, 0.25)));
	}

	#[test]
	fn phase_duration_depends_on_custom_state() {
		let mut request = EventTextRequest::new("EVENT_TEST", Color::WHITE, 6.0);
		assert_eq!(request.phase_duration(), 2.0);
		request.custom_state = Some("Flash".into());
		assert_eq!(request.phase_duration(), 6.0);
	}

	#[test]
	fn queue_is_fifo() {
		let queue = EventTextQueue::new();
		let sink: &dyn EventTextSink = &queue;
		sink.enqueue(EventTextRequest::new("first", Color::WHITE, 1.0));
		sink.enqueue(EventTextRequest::new("second", Color::WHITE, 1.0));

		assert_eq!(queue.len(), 2);
		assert_eq!(queue.pop().map(|r| r.token), Some("first".to_owned()));
		assert_eq!(queue.pop().map(|r| r.token), Some("second".to_owned()));
		assert!(queue.is_empty());
	}
}
