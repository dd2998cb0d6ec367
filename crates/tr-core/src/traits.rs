//! Seams to external collaborators.

use std::sync::Arc;

/// Luminosity-section validity lookup (good/bad run-lumi classification).
pub trait LumiLookup {
    /// Whether lumi section `lumi` of run `run` is accepted.
    fn is_good(&self, run: u32, lumi: u32) -> bool;
}

/// Adapter turning a closure into a [`LumiLookup`].
#[derive(Debug, Clone, Copy)]
pub struct FnLookup<F>(pub F);

impl<F> LumiLookup for FnLookup<F>
where
    F: Fn(u32, u32) -> bool,
{
    fn is_good(&self, run: u32, lumi: u32) -> bool {
        (self.0)(run, lumi)
    }
}

impl<L: LumiLookup + ?Sized> LumiLookup for &L {
    fn is_good(&self, run: u32, lumi: u32) -> bool {
        (**self).is_good(run, lumi)
    }
}

impl<L: LumiLookup + ?Sized> LumiLookup for Arc<L> {
    fn is_good(&self, run: u32, lumi: u32) -> bool {
        (**self).is_good(run, lumi)
    }
}
