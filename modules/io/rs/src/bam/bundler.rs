use ahash::AHashMap;

use strandit_core_rs::loc::Contig;
use strandit_core_rs::num::PrimInt;
use strandit_core_rs::source::{Alignment, AlignmentRecord};

/// Read name + hit index: identifies mates that belong to the same pair.
pub type MateKey = (Vec<u8>, Option<i64>);

/// Pairs mates arriving in arbitrary order. A mate waits in the cache until its partner shows up.
#[derive(Debug, Clone)]
pub struct Bundler<Ctg: Contig, Idx: PrimInt> {
    mate1: AHashMap<MateKey, Alignment<Ctg, Idx>>,
    mate2: AHashMap<MateKey, Alignment<Ctg, Idx>>,
}

impl<Ctg: Contig, Idx: PrimInt> Default for Bundler<Ctg, Idx> {
    fn default() -> Self {
        Self {
            mate1: AHashMap::new(),
            mate2: AHashMap::new(),
        }
    }
}

impl<Ctg: Contig, Idx: PrimInt> Bundler<Ctg, Idx> {
    /// Mates still waiting for their partner.
    pub fn pending(&self) -> usize {
        self.mate1.len() + self.mate2.len()
    }

    pub fn clear(&mut self) {
        self.mate1.clear();
        self.mate2.clear();
    }

    pub fn push(
        &mut self,
        key: MateKey,
        alignment: Alignment<Ctg, Idx>,
        is_mate1: bool,
    ) -> Option<AlignmentRecord<Ctg, Idx>> {
        let (cache, partners) = if is_mate1 {
            (&mut self.mate1, &mut self.mate2)
        } else {
            (&mut self.mate2, &mut self.mate1)
        };

        match partners.remove(&key) {
            Some(partner) => {
                let (mate1, mate2) = if is_mate1 {
                    (alignment, partner)
                } else {
                    (partner, alignment)
                };
                Some(AlignmentRecord::Paired { mate1, mate2 })
            }
            None => {
                if cache.insert(key, alignment).is_some() {
                    log::error!(
                        "Duplicated mate detected, check that read names and HI tags are unique"
                    );
                }
                None
            }
        }
    }
}
