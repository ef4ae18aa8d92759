use std::ops::Range;

/// An iterator that batches the chains to process.
///
/// Batches have sizes as equal as possible, none larger than the desired batch size.
/// The chains that would have made a small last batch are spread over the first batches instead.
#[derive(Clone, Debug)]
pub struct BatchIterator {
    range_start: usize,
    batch_size: usize,
    chains_remainder: usize,
    batch_number: usize,
    batches: usize,
}

impl BatchIterator {
    /// Creates a new batch iterator where `chains_len` is the total number of chains to generate.
    pub fn new(chains_len: usize, desired_batch_size: usize) -> BatchIterator {
        let desired_batch_size = desired_batch_size.max(1);

        // we need at least one batch, even an empty one, so that progress gets reported
        let batches = chains_len.div_ceil(desired_batch_size).max(1);
        let (batch_size, chains_remainder) = (chains_len / batches, chains_len % batches);

        BatchIterator {
            range_start: 0,
            batch_size,
            chains_remainder,
            batches,
            batch_number: 0,
        }
    }
}

impl Iterator for BatchIterator {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.batch_number == self.batches {
            return None;
        }

        let batch_size = if self.batch_number < self.chains_remainder {
            self.batch_size + 1
        } else {
            self.batch_size
        };

        let range_end = self.range_start + batch_size;
        let range = self.range_start..range_end;
        self.range_start = range_end;

        self.batch_number += 1;
        Some(range)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (
            self.batches - self.batch_number,
            Some(self.batches - self.batch_number),
        )
    }
}

impl ExactSizeIterator for BatchIterator {}
