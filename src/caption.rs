//! Auto-generated figure caption assembly
//!
//! Every drawn data source contributes one fragment, in plot order. Data
//! files carry their own text in a `#short caption:` comment; a file
//! without one gets a logged warning and no fragment.

use log::warn;

use crate::table::Table;

const HEADER: &str = "** This short caption is auto-generated. DO NOT EDIT. **\n\
                      Please see individual datafiles for full descriptions. \n\n";

const COLOR_CODING_NOTE: &str = "Lines and points are color coded by wavelength of observation.\n\n";

/// Ordered collection of caption fragments
#[derive(Debug, Clone)]
pub struct Caption {
    parts: Vec<String>,
}

impl Caption {
    /// Start a caption; `color_coded` adds the color coding sentence
    pub fn new(color_coded: bool) -> Self {
        let mut parts = vec![HEADER.to_string()];
        if color_coded {
            parts.push(COLOR_CODING_NOTE.to_string());
        }
        Self { parts }
    }

    /// Append one `-- ...` fragment
    pub fn push_fragment(&mut self, text: &str) {
        self.parts.push(format!("-- {text}\n\n"));
    }

    /// Append the fragment a data file carries, warning when it has none
    pub fn push_from_table(&mut self, table: &Table) {
        match table.short_caption() {
            Some(text) => self.push_fragment(text),
            None => warn!("no caption for {}", table.path()),
        }
    }

    /// Number of `-- ...` fragments accumulated so far
    pub fn fragment_count(&self) -> usize {
        self.parts.iter().filter(|p| p.starts_with("-- ")).count()
    }

    /// The complete caption text
    pub fn text(&self) -> String {
        self.parts.concat()
    }

    /// True when any fragment contains `needle`
    pub fn mentions(&self, needle: &str) -> bool {
        self.parts.iter().any(|p| p.contains(needle))
    }
}
