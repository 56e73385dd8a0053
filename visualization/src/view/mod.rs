//! Views over the current trace step
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod bar_view;
pub mod code_view;

pub use self::bar_view::{BarStatus, Palette, SceneConfig, SceneObject, SceneSynchronizer};
pub use self::code_view::{CodeDisplay, CodePanel};
