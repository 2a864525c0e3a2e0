//! Expansion of expressions into flat value sequences.
//!
//! Values are grouped into rows of `arity` components. Everything except a
//! product has arity 1; a product row is the concatenation of one row from
//! each operand. Shuffling and sampling move whole rows; weighted picks move
//! whole entry expansions.

use rand::seq::SliceRandom;
use rand::Rng;
use rvs_ir::Replacement;

use crate::rng::SequenceRng;

/// An expansion would exceed the configured value limit.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct LimitExceeded;

/// Values of an expression, `arity` per row.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Expansion {
    pub values: Vec<u32>,
    pub arity: usize,
}

impl Expansion {
    /// Scalar values (arity 1).
    pub fn scalars(values: Vec<u32>) -> Self {
        Expansion { values, arity: 1 }
    }

    pub fn rows(&self) -> usize {
        self.values.len() / self.arity
    }

    fn row(&self, index: usize) -> &[u32] {
        let start = index * self.arity;
        &self.values[start..start + self.arity]
    }

    /// `start, start + step, ...` up to and including the largest value not
    /// above `stop`.
    pub fn range(start: u32, stop: u32, step: u32, limit: usize) -> Result<Self, LimitExceeded> {
        if start > stop {
            return Ok(Expansion::scalars(Vec::new()));
        }
        let step = step.max(1);
        let count = u64::from(stop - start) / u64::from(step) + 1;
        check_limit(count, limit)?;
        Ok(Expansion::scalars(
            (start..=stop).step_by(step as usize).collect(),
        ))
    }

    /// Operands appended in order.
    ///
    /// The arity is kept when every operand agrees on it, otherwise the rows
    /// dissolve into scalars.
    pub fn concat(parts: Vec<Expansion>, limit: usize) -> Result<Self, LimitExceeded> {
        let total: u64 = parts.iter().map(|p| p.values.len() as u64).sum();
        check_limit(total, limit)?;

        let arity = match parts.split_first() {
            Some((first, rest)) if rest.iter().all(|p| p.arity == first.arity) => first.arity,
            _ => 1,
        };
        let mut values = Vec::with_capacity(total as usize);
        for part in parts {
            values.extend(part.values);
        }
        Ok(Expansion { values, arity })
    }

    /// Cartesian product of the operands' rows, last operand varying fastest.
    pub fn product(parts: &[Expansion], limit: usize) -> Result<Self, LimitExceeded> {
        let arity: usize = parts.iter().map(|p| p.arity).sum::<usize>().max(1);
        let mut rows: u64 = 1;
        for part in parts {
            rows = rows.saturating_mul(part.rows() as u64);
        }
        check_limit(rows.saturating_mul(arity as u64), limit)?;
        if parts.is_empty() || rows == 0 {
            return Ok(Expansion {
                values: Vec::new(),
                arity,
            });
        }

        let mut values = Vec::with_capacity(rows as usize * arity);
        let mut indices = vec![0usize; parts.len()];
        loop {
            for (part, &index) in parts.iter().zip(&indices) {
                values.extend_from_slice(part.row(index));
            }
            // Odometer increment, rightmost digit first.
            let mut digit = parts.len();
            loop {
                if digit == 0 {
                    return Ok(Expansion { values, arity });
                }
                digit -= 1;
                indices[digit] += 1;
                if indices[digit] < parts[digit].rows() {
                    break;
                }
                indices[digit] = 0;
            }
        }
    }

    /// Rows in a uniformly random order.
    #[must_use]
    pub fn shuffle(self, rng: &mut SequenceRng) -> Self {
        let mut order: Vec<usize> = (0..self.rows()).collect();
        order.shuffle(rng);
        self.gather(&order)
    }

    /// `count` rows drawn with replacement (as many as there are rows when
    /// `count` is `None`). Sampling nothing from nothing yields nothing.
    pub fn sample(
        self,
        count: Option<u32>,
        rng: &mut SequenceRng,
        limit: usize,
    ) -> Result<Self, LimitExceeded> {
        let rows = self.rows();
        if rows == 0 {
            return Ok(self);
        }
        let count = count.map_or(rows, |c| c as usize);
        check_limit((count as u64).saturating_mul(self.arity as u64), limit)?;

        let order: Vec<usize> = (0..count).map(|_| rng.gen_range(0..rows)).collect();
        Ok(self.gather(&order))
    }

    /// Every row drawn once without replacement, from a pool that shrinks by
    /// one row per draw.
    #[must_use]
    pub fn unique(self, rng: &mut SequenceRng) -> Self {
        let mut pool: Vec<usize> = (0..self.rows()).collect();
        let mut order = Vec::with_capacity(pool.len());
        while !pool.is_empty() {
            order.push(pool.swap_remove(rng.gen_range(0..pool.len())));
        }
        self.gather(&order)
    }

    /// Entries picked by weight, each pick contributing the entry's whole
    /// expansion.
    ///
    /// The pool holds entry `i` `weights[i]` times. Without replacement the
    /// pool is dealt in a random order; with replacement there are as many
    /// uniform picks from the pool as it has slots.
    pub fn weighted(
        entries: &[Expansion],
        weights: &[u32],
        replacement: Replacement,
        rng: &mut SequenceRng,
        limit: usize,
    ) -> Result<Self, LimitExceeded> {
        let slots: u64 = weights.iter().map(|&w| u64::from(w)).sum();
        check_limit(slots, limit)?;

        let mut pool = Vec::with_capacity(slots as usize);
        for (index, &weight) in weights.iter().enumerate().take(entries.len()) {
            pool.extend(std::iter::repeat(index).take(weight as usize));
        }
        let picks: Vec<usize> = match replacement {
            Replacement::Without => {
                pool.shuffle(rng);
                pool
            }
            Replacement::With => (0..pool.len())
                .filter_map(|_| pool.choose(rng).copied())
                .collect(),
        };

        let total: u64 = picks
            .iter()
            .map(|&index| entries[index].values.len() as u64)
            .sum();
        check_limit(total, limit)?;
        Expansion::concat(
            picks.into_iter().map(|index| entries[index].clone()).collect(),
            limit,
        )
    }

    fn gather(&self, order: &[usize]) -> Self {
        let mut values = Vec::with_capacity(order.len() * self.arity);
        for &index in order {
            values.extend_from_slice(self.row(index));
        }
        Expansion {
            values,
            arity: self.arity,
        }
    }
}

#[inline]
fn check_limit(count: u64, limit: usize) -> Result<(), LimitExceeded> {
    if count > limit as u64 {
        Err(LimitExceeded)
    } else {
        Ok(())
    }
}
