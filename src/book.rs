use crate::ataxx::Position;
use crate::cli::BookOptions;
use anyhow::{Context, Result, bail};
use rand::Rng;
use rand::seq::SliceRandom;
use std::fs;

/// The pool of starting positions, one FEN per line, validated at load.
#[derive(Debug, Clone)]
pub struct OpeningBook {
    openings: Vec<Position>,
}

impl OpeningBook {
    pub fn new(options: &BookOptions, rng: &mut impl Rng) -> Result<OpeningBook> {
        let text = fs::read_to_string(&options.file)
            .with_context(|| format!("failed to read opening book {}", options.file))?;

        let mut openings = vec![];
        for (i, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let pos = Position::from_fen(line)
                .with_context(|| format!("bad FEN on line {} of {}", i + 1, options.file))?;
            openings.push(pos);
        }

        if openings.is_empty() {
            bail!("opening book {} contains no positions", options.file);
        }
        if options.start_index > openings.len() {
            bail!(
                "opening start index {} exceeds book size {}",
                options.start_index,
                openings.len()
            );
        }

        if options.random_order {
            openings.shuffle(rng);
        } else {
            openings.rotate_left(options.start_index - 1);
        }

        Ok(OpeningBook { openings })
    }

    pub fn len(&self) -> usize {
        self.openings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.openings.is_empty()
    }

    pub fn get(&self, index: usize) -> Position {
        self.openings[index % self.openings.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::io::Write;

    fn write_book(lines: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{lines}").unwrap();
        file
    }

    fn options(file: &tempfile::NamedTempFile) -> BookOptions {
        BookOptions {
            file: file.path().to_string_lossy().into_owned(),
            random_order: false,
            start_index: 1,
        }
    }

    #[test]
    fn loads_and_indexes() {
        let file = write_book("x5o/7/7/7/7/7/o5x x 0 1\n\nx5o/7/2-1-2/7/2-1-2/7/o5x o 0 1\n");
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let book = OpeningBook::new(&options(&file), &mut rng).unwrap();

        assert_eq!(book.len(), 2);
        assert_eq!(book.get(0), Position::startpos());
        // Indexing wraps around the end of the book.
        assert_eq!(book.get(2), book.get(0));
    }

    #[test]
    fn start_index_rotates() {
        let file = write_book("x5o/7/7/7/7/7/o5x x 0 1\nx5o/7/2-1-2/7/2-1-2/7/o5x o 0 1\n");
        let mut opts = options(&file);
        opts.start_index = 2;
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let book = OpeningBook::new(&opts, &mut rng).unwrap();

        assert_eq!(book.get(1), Position::startpos());
    }

    #[test]
    fn rejects_bad_fen() {
        let file = write_book("x5o/7/7/7/7/7/o5x x 0 1\nnot a fen\n");
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let err = OpeningBook::new(&options(&file), &mut rng).unwrap_err();
        assert!(err.to_string().contains("line 2"), "{err:#}");
    }

    #[test]
    fn rejects_empty_book() {
        let file = write_book("\n\n");
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(OpeningBook::new(&options(&file), &mut rng).is_err());
    }

    #[test]
    fn shuffle_is_seed_deterministic() {
        let mut lines = String::new();
        for i in 1..=20 {
            lines.push_str(&format!("x5o/7/7/7/7/7/o5x x 0 {i}\n"));
        }
        let file = write_book(&lines);
        let mut opts = options(&file);
        opts.random_order = true;

        let mut rng1 = ChaCha8Rng::seed_from_u64(7);
        let book1 = OpeningBook::new(&opts, &mut rng1).unwrap();
        let mut rng2 = ChaCha8Rng::seed_from_u64(7);
        let book2 = OpeningBook::new(&opts, &mut rng2).unwrap();

        let order1: Vec<_> = (0..20).map(|i| book1.get(i)).collect();
        let order2: Vec<_> = (0..20).map(|i| book2.get(i)).collect();
        assert_eq!(order1, order2);
    }
}
