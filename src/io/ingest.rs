//! Dataset file parsing.
//!
//! Both files are whitespace-separated token streams:
//!
//! ```text
//! train                 <- identifier (ignored)
//! 2                     <- attribute count
//! 3                     <- record count
//! 1.0 2.0 10.5          <- attributes..., target   (training file)
//! 1.0 2.0               <- attributes...           (test file)
//! ```
//!
//! Line breaks carry no meaning; a record may span lines. Parsed features are
//! placed after a leading bias column of `1.0`.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::domain::{TestSet, TrainingSet};
use crate::error::OlsError;
use crate::math::Matrix;

/// Identifiers in the usual datasets are at most this long (`train`, `data`).
const MAX_IDENTIFIER_LEN: usize = 6;

/// Dataset header: identifier plus the two declared counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub identifier: String,
    pub num_attributes: usize,
    pub num_records: usize,
}

impl Header {
    /// Design matrix width: the attributes plus the bias column.
    fn cols(&self) -> usize {
        self.num_attributes + 1
    }
}

/// Read and parse a training file.
pub fn read_training_file(path: &Path) -> Result<TrainingSet, OlsError> {
    let text = read_dataset_text(path)?;
    parse_training(&path.display().to_string(), &text)
}

/// Read and parse a test file.
pub fn read_test_file(path: &Path) -> Result<TestSet, OlsError> {
    let text = read_dataset_text(path)?;
    parse_test(&path.display().to_string(), &text)
}

/// Parse the contents of a training file. `source_name` is only used in errors.
pub fn parse_training(source_name: &str, text: &str) -> Result<TrainingSet, OlsError> {
    let mut tokens = Tokens::new(source_name, text);
    let header = tokens.header()?;
    let cols = header.cols();

    // Declared counts are untrusted; buffers grow with the tokens actually read.
    let mut x = Vec::new();
    let mut y = Vec::new();
    for record in 0..header.num_records {
        x.push(1.0);
        for attr in 0..header.num_attributes {
            x.push(tokens.float(&format!("record {}, attribute {}", record + 1, attr + 1))?);
        }
        y.push(tokens.float(&format!("record {}, target", record + 1))?);
    }
    tokens.finish();

    debug!(
        source = source_name,
        attributes = header.num_attributes,
        records = header.num_records,
        "parsed training file"
    );

    Ok(TrainingSet {
        identifier: header.identifier,
        num_attributes: header.num_attributes,
        x: Matrix::from_vec(header.num_records, cols, x)?,
        y: Matrix::from_vec(header.num_records, 1, y)?,
    })
}

/// Parse the contents of a test file. `source_name` is only used in errors.
pub fn parse_test(source_name: &str, text: &str) -> Result<TestSet, OlsError> {
    let mut tokens = Tokens::new(source_name, text);
    let header = tokens.header()?;
    let cols = header.cols();

    let mut x = Vec::new();
    for record in 0..header.num_records {
        x.push(1.0);
        for attr in 0..header.num_attributes {
            x.push(tokens.float(&format!("record {}, attribute {}", record + 1, attr + 1))?);
        }
    }
    tokens.finish();

    debug!(
        source = source_name,
        attributes = header.num_attributes,
        records = header.num_records,
        "parsed test file"
    );

    Ok(TestSet {
        identifier: header.identifier,
        num_attributes: header.num_attributes,
        x: Matrix::from_vec(header.num_records, cols, x)?,
    })
}

/// Parse only the header of a dataset.
pub fn parse_header(source_name: &str, text: &str) -> Result<Header, OlsError> {
    Tokens::new(source_name, text).header()
}

/// Read a dataset file into memory.
pub fn read_dataset_text(path: &Path) -> Result<String, OlsError> {
    fs::read_to_string(path)
        .map_err(|e| OlsError::malformed(path.display().to_string(), format!("cannot read file: {e}")))
}

/// Token cursor that remembers line numbers for error messages.
struct Tokens<'a> {
    source_name: &'a str,
    iter: Box<dyn Iterator<Item = (usize, &'a str)> + 'a>,
    last_line: usize,
}

impl<'a> Tokens<'a> {
    fn new(source_name: &'a str, text: &'a str) -> Self {
        let iter = text
            .lines()
            .enumerate()
            .flat_map(|(idx, line)| line.split_whitespace().map(move |tok| (idx + 1, tok)));
        Self {
            source_name,
            iter: Box::new(iter),
            last_line: 1,
        }
    }

    fn next(&mut self, what: &str) -> Result<(usize, &'a str), OlsError> {
        match self.iter.next() {
            Some((line, tok)) => {
                self.last_line = line;
                Ok((line, tok))
            }
            None => Err(OlsError::malformed(
                self.source_name,
                format!("unexpected end of input after line {} (expected {what})", self.last_line),
            )),
        }
    }

    fn header(&mut self) -> Result<Header, OlsError> {
        let (_, identifier) = self.next("identifier")?;
        if identifier.chars().count() > MAX_IDENTIFIER_LEN {
            debug!(identifier, "dataset identifier is longer than usual");
        }
        let num_attributes = self.count("attribute count")?;
        let num_records = self.count("record count")?;
        if num_records == 0 {
            return Err(OlsError::malformed(self.source_name, "record count must be at least 1"));
        }
        let fits = num_attributes
            .checked_add(1)
            .and_then(|cols| cols.checked_mul(num_records))
            .is_some();
        if !fits {
            return Err(OlsError::malformed(
                self.source_name,
                format!("{num_records} records of {num_attributes} attribute(s) exceed the addressable size"),
            ));
        }
        Ok(Header {
            identifier: identifier.to_string(),
            num_attributes,
            num_records,
        })
    }

    fn count(&mut self, what: &str) -> Result<usize, OlsError> {
        let (line, tok) = self.next(what)?;
        tok.parse::<usize>().map_err(|_| {
            OlsError::malformed(
                self.source_name,
                format!("line {line}: {what} must be a non-negative integer, got '{tok}'"),
            )
        })
    }

    fn float(&mut self, what: &str) -> Result<f64, OlsError> {
        let (line, tok) = self.next(what)?;
        match tok.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(OlsError::malformed(
                self.source_name,
                format!("line {line}: {what} must be a finite number, got '{tok}'"),
            )),
        }
    }

    /// Extra tokens after the declared records are ignored.
    fn finish(mut self) {
        let extra = self.iter.by_ref().count();
        if extra > 0 {
            warn!(
                source = self.source_name,
                extra, "ignoring tokens after the declared records"
            );
        }
    }
}
