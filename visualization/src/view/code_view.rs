//! Pseudocode panel
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::sync::Arc;

use parking_lot::Mutex;

use sortscope_core::algorithm::state::CodeLines;
use sortscope_core::algorithm::SortAlgorithm;

/// Code display collaborator
pub trait CodeDisplay {
    /// Replaces the listing, clearing any highlight
    fn show_listing(&mut self, algorithm: SortAlgorithm, listing: &'static [&'static str]);

    /// Highlights `lines` of the current listing; an empty set clears it
    fn highlight(&mut self, lines: &CodeLines);
}

#[derive(Debug, Default)]
struct PanelState {
    algorithm: Option<SortAlgorithm>,
    listing: &'static [&'static str],
    highlighted: CodeLines,
    highlight_updates: usize,
}

/// In-memory [`CodeDisplay`] that renders to text
///
/// Clones share the same panel.
#[derive(Debug, Clone, Default)]
pub struct CodePanel {
    state: Arc<Mutex<PanelState>>,
}

impl CodePanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn algorithm(&self) -> Option<SortAlgorithm> {
        self.state.lock().algorithm
    }

    pub fn highlighted(&self) -> CodeLines {
        self.state.lock().highlighted.clone()
    }

    /// Text of the highlighted lines, in listing order
    pub fn highlighted_text(&self) -> Vec<&'static str> {
        let state = self.state.lock();
        state
            .highlighted
            .iter()
            .filter_map(|line| state.listing.get(line).copied())
            .collect()
    }

    pub fn highlight_updates(&self) -> usize {
        self.state.lock().highlight_updates
    }

    /// Listing with a `▶` marker in front of highlighted lines
    pub fn render_text(&self) -> String {
        let state = self.state.lock();
        let mut out = String::new();
        for (index, line) in state.listing.iter().enumerate() {
            let marker = if state.highlighted.contains(index) { "▶ " } else { "  " };
            out.push_str(&format!("{marker}{index:>2}  {line}\n"));
        }
        out
    }
}

impl CodeDisplay for CodePanel {
    fn show_listing(&mut self, algorithm: SortAlgorithm, listing: &'static [&'static str]) {
        let mut state = self.state.lock();
        state.algorithm = Some(algorithm);
        state.listing = listing;
        state.highlighted = CodeLines::none();
    }

    fn highlight(&mut self, lines: &CodeLines) {
        let mut state = self.state.lock();
        state.highlighted = lines.clone();
        state.highlight_updates += 1;
    }
}
