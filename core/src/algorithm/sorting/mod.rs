//! Traced comparison sorts
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod bubble;
pub mod insertion;
pub mod merge;
pub mod selection;

pub use self::bubble::BubbleSort;
pub use self::insertion::InsertionSort;
pub use self::merge::MergeSort;
pub use self::selection::SelectionSort;
