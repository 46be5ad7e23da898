//! Permutations of finite ordered sets.

use std::collections::HashSet;

use anyhow::{self, format_err};
use derive_builder::Builder;
use num_traits::Inv;

#[cfg(test)]
#[path = "permutation_tests.rs"]
mod permutation_tests;

/// A structure to manage permutation actions of a finite set.
///
/// Permutations act by gathering: applying a permutation $`\pi`$ to an ordered sequence
/// $`(a_0, a_1, \ldots)`$ gives $`(a_{\pi(0)}, a_{\pi(1)}, \ldots)`$.
#[derive(Builder, Clone, Debug, PartialEq, Eq, Hash)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct Permutation {
    /// The rank of the permutation, *i.e.* the number of elements in the finite set on which the
    /// permutation acts.
    rank: usize,

    /// If the permutation is to act on an ordered sequence of $`n`$ integers, $`0, 1, \ldots, n`$
    /// where $`n`$ is the rank, then this gives the result of the action.
    #[builder(setter(custom))]
    image: Vec<usize>,
}

impl PermutationBuilder {
    fn image(&mut self, perm: &[usize]) -> &mut Self {
        self.image = Some(perm.to_vec());
        self
    }

    fn validate(&self) -> Result<(), String> {
        let rank = self.rank.ok_or("Permutation rank has not been set.")?;
        let image = self
            .image
            .as_ref()
            .ok_or("Permutation image has not been set.")?;
        if image.len() != rank {
            return Err(format!(
                "The permutation image `{image:?}` does not contain {rank} elements."
            ));
        }
        let distinct = image.iter().collect::<HashSet<_>>();
        if distinct.len() != rank || image.iter().any(|&i| i >= rank) {
            return Err(format!(
                "The permutation image `{image:?}` is not a rearrangement of 0..{rank}."
            ));
        }
        Ok(())
    }
}

impl Permutation {
    /// Returns a builder to construct a new permutation.
    #[must_use]
    fn builder() -> PermutationBuilder {
        PermutationBuilder::default()
    }

    /// Constructs a permutation from its image.
    ///
    /// # Errors
    ///
    /// Errors if `image` is not a rearrangement of `0..image.len()`.
    pub fn from_image(image: &[usize]) -> Result<Self, anyhow::Error> {
        Self::builder()
            .rank(image.len())
            .image(image)
            .build()
            .map_err(|err| format_err!(err))
    }

    /// The image of the permutation.
    pub fn image(&self) -> &Vec<usize> {
        &self.image
    }
}

// ---
// Inv
// ---
impl Inv for &Permutation {
    type Output = Permutation;

    fn inv(self) -> Self::Output {
        let mut image_inv = (0..self.rank).collect::<Vec<_>>();
        image_inv.sort_by_key(|&i| self.image[i]);
        Self::Output::builder()
            .rank(self.rank)
            .image(&image_inv)
            .build()
            .unwrap_or_else(|err| panic!("Unable to construct an inverse `Permutation`: {err}"))
    }
}

impl Inv for Permutation {
    type Output = Permutation;

    fn inv(self) -> Self::Output {
        (&self).inv()
    }
}

/// A trait for ordered collections whose elements can be rearranged by permutations.
pub trait PermutableCollection
where
    Self: Sized,
{
    /// Determines the permutation that, when gathered from `other`, yields `self`. Returns `None`
    /// if `self` and `other` are not rearrangements of each other.
    fn get_perm_of(&self, other: &Self) -> Option<Permutation>;
}
