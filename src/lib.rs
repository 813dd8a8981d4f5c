//! formfit: a one-shot fit-to-content layout pass for form layouts built
//! from absolute pixel rectangles.
//!
//! A form designer places widgets at fixed coordinates; translated text or
//! larger fonts then overflow them. This crate discovers the implicit
//! row/column structure of such a form from nothing but the rectangles,
//! grows each widget and its window just enough that no content is
//! clipped, and preserves the alignment the designer built in. It runs
//! once per window, between construction and first display; afterwards
//! widgets resize the ordinary anchored way.
//!
//! The engine owns no widgets. The host toolkit implements
//! [`WidgetHost`] over its real widget tree and hands the engine a
//! container; see [`Engine::run`].

pub mod common;
pub mod engine;
pub mod geometry;
pub mod model;
pub mod widget;

pub use common::config::{DebugSettings, LimitSettings, Settings};
pub use engine::{Engine, FitReport};
pub use geometry::{Orientation, Point, Rect, Size, Span};
pub use widget::{WidgetHost, WidgetId};
