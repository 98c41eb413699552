//! Header log: the ordered sequence of selectors emitted at delta=0 before
//! any timed event.

use crate::constants::MAX_HEADER_LEN;
use crate::error::Result;
use crate::selector::Selector;
use log::warn;

#[derive(Debug, Default)]
pub(crate) struct HeaderLog {
    selectors: Vec<Selector>,
}

impl HeaderLog {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, sel: Selector) -> Result<()> {
        if self.selectors.len() >= MAX_HEADER_LEN {
            warn!("header log growth rejected at {} entries (max {})", self.selectors.len(), MAX_HEADER_LEN);
            cap_bail!("header log full (max {} entries)", MAX_HEADER_LEN);
        }
        self.selectors.push(sel);
        Ok(())
    }

    pub(crate) fn entries(&self) -> &[Selector] {
        &self.selectors
    }
}
