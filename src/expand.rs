//! Variation expansion: swap every catalog variation into one slot of
//! an element's declaration and keep the ones that survive a warm-up
//! run with usable statistics.  Handy for surveying what a parameter
//! set looks like under each variation.

use rand::RngCore;

use crate::error::Error;
use crate::model::Element;
use crate::stats::SpanCollector;
use crate::system::Progress;
use crate::variation::catalog;

pub struct ExpandVariation {
    pub index: usize,
    pub iterations: usize,
}

impl ExpandVariation {
    pub fn new(index: usize) -> ExpandVariation {
        ExpandVariation {
            index,
            iterations: 100_000,
        }
    }

    pub fn run(
        &self,
        element: &Element,
        rng: &mut dyn RngCore,
        progress: &mut dyn Progress,
    ) -> Result<Element, Error> {
        if element.is_invalid() {
            return Err(Error::EmptyElement);
        }
        if self.index >= element.varias.len() {
            return Err(Error::VariationIndex {
                index: self.index,
                count: element.varias.len(),
            });
        }
        let mut parent = Element::new();
        for varia in catalog() {
            let mut varias = element.varias.clone();
            varias[self.index] = varia;
            let mut child = Element::with_parts(varias, element.flames.clone(), vec![]);
            let sys = child.flame_system();
            let mut stat = SpanCollector::new();
            let succeeded = sys.draw(self.iterations, &mut stat, progress, rng);
            if succeeded && stat.is_valid() {
                child.stat = Some(stat.node());
                parent.add(child);
            } else {
                tracing::debug!(
                    variation = %child.varias[self.index].name,
                    "expansion candidate diverged, skipping"
                );
            }
        }
        Ok(parent)
    }
}
