//! Tensor cell list reading
//!
//! Reads the store's cell-list convention into a [`Tensor`]:
//!
//! ```text
//! [ {"address": {"x": "0", "y": "a"}, "value": 1.5}, ... ]
//! ```

use crate::error::ReadError;
use crate::stream::{ObjectFields, TokenKind, TokenStream};
use tmod_tensor::{Label, Tensor, TensorBuilder, TensorType};

/// Reads a cell list from a token stream into a tensor of a given type
///
/// Implement this to plug in another cell encoding.
pub trait CellReader: Send + Sync {
    /// Read cells
    ///
    /// The stream is positioned on the first token of the cell list and is
    /// left on its last token.
    ///
    /// # Errors
    /// Returns error if the cells are malformed or do not fit `target`
    fn read_cells(
        &self,
        stream: &mut dyn TokenStream,
        target: &TensorType,
    ) -> Result<Tensor, ReadError>;
}

/// Reader for JSON cell lists
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCellReader {
    reject_duplicates: bool,
    max_cells: Option<usize>,
}

impl JsonCellReader {
    /// Create reader (repeated addresses: last one wins)
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail on repeated addresses instead of overwriting
    #[inline]
    #[must_use]
    pub fn reject_duplicates(mut self, reject: bool) -> Self {
        self.reject_duplicates = reject;
        self
    }

    /// Stop reading once more than `max` cell entries are seen
    ///
    /// Counts entries as listed, so repeats of one address count too.
    #[inline]
    #[must_use]
    pub fn with_max_cells(mut self, max: usize) -> Self {
        self.max_cells = Some(max);
        self
    }
}

impl CellReader for JsonCellReader {
    fn read_cells(
        &self,
        stream: &mut dyn TokenStream,
        target: &TensorType,
    ) -> Result<Tensor, ReadError> {
        match stream.current_kind() {
            Some(TokenKind::StartArray) => {}
            other => return Err(ReadError::unexpected("array of tensor cells", other)),
        }

        let nesting = stream.nesting();
        let mut builder = Tensor::builder(target.clone()).reject_duplicates(self.reject_duplicates);
        let mut count = 0usize;
        loop {
            match stream.advance() {
                None => return Err(ReadError::UnexpectedEnd),
                Some(TokenKind::EndArray) if stream.nesting() == nesting => break,
                Some(TokenKind::StartObject) => {
                    count += 1;
                    if let Some(limit) = self.max_cells.filter(|limit| count > *limit) {
                        return Err(ReadError::TooManyCells { count, limit });
                    }
                    read_cell(stream, &mut builder)?;
                }
                other => return Err(ReadError::unexpected("tensor cell object", other)),
            }
        }

        tracing::trace!("Read {} cells for {}", builder.len(), target);
        Ok(builder.build())
    }
}

fn read_cell(stream: &mut dyn TokenStream, builder: &mut TensorBuilder) -> Result<(), ReadError> {
    let fields = ObjectFields::enter(&*stream)?;
    let mut address = None;
    let mut value = None;

    while let Some(key) = fields.next_field(stream)? {
        match key.as_str() {
            "address" => address = Some(read_address(stream)?),
            "value" => value = Some(read_value(stream)?),
            _ => return Err(ReadError::UnknownCellKey(key)),
        }
    }

    let address = address.ok_or(ReadError::MissingCellKey("address"))?;
    let value = value.ok_or(ReadError::MissingCellKey("value"))?;
    let pairs: Vec<(&str, Label)> = address
        .iter()
        .map(|(dim, label)| (dim.as_str(), label.clone()))
        .collect();
    builder.cell_by_names(&pairs, value)?;
    Ok(())
}

fn read_address(stream: &mut dyn TokenStream) -> Result<Vec<(String, Label)>, ReadError> {
    let fields = ObjectFields::enter(&*stream)?;
    let mut labels = Vec::new();
    while let Some(dimension) = fields.next_field(stream)? {
        let label = match stream.current_kind() {
            Some(TokenKind::String) => Label::Mapped(stream.current_text().unwrap_or_default().to_string()),
            Some(TokenKind::Number) => stream
                .current_text()
                .and_then(|text| text.parse::<u64>().ok())
                .map(Label::Indexed)
                .ok_or_else(|| ReadError::UnexpectedToken {
                    expected: "string or non-negative integer label",
                    found: stream.current_text().unwrap_or_default().to_string(),
                })?,
            other => return Err(ReadError::unexpected("address label", other)),
        };
        labels.push((dimension, label));
    }
    Ok(labels)
}

fn read_value(stream: &mut dyn TokenStream) -> Result<f64, ReadError> {
    match stream.current_kind() {
        Some(TokenKind::Number) => stream
            .current_number()
            .ok_or_else(|| ReadError::unexpected("finite cell value", Some(TokenKind::Number))),
        other => Err(ReadError::unexpected("numeric cell value", other)),
    }
}
