//! `FrTable`: a named, columnar data table, grounded in
//! `examples/original_source/.../Version8/FrTable.hh`.

use crate::error::{Error, Result};
use crate::stream::{PayloadReader, PayloadWriter};
use crate::vect::FrVect;

pub const NAME: &str = "FrTable";

#[derive(Debug, Clone)]
pub struct FrTable {
    pub name: String,
    pub comment: String,
    pub n_row: u32,
    pub column_names: Vec<String>,
    pub columns: Vec<FrVect>,
}

impl FrTable {
    pub fn to_payload(&self) -> Vec<u8> {
        let mut w = PayloadWriter::new();
        w.write_string(&self.name);
        w.write_string(&self.comment);
        w.write_u32(self.n_row);
        w.write_u16(self.column_names.len() as u16);
        for name in &self.column_names {
            w.write_string(name);
        }
        w.write_u16(self.columns.len() as u16);
        for v in &self.columns {
            w.write_bytes(&v.to_payload());
        }
        w.into_bytes()
    }

    pub fn from_payload(r: &mut PayloadReader) -> Result<Self> {
        let name = r.read_string()?;
        let comment = r.read_string()?;
        let n_row = r.read_u32()?;
        let column_count = r.read_u16()? as usize;
        let mut column_names = Vec::with_capacity(column_count);
        for _ in 0..column_count {
            column_names.push(r.read_string()?);
        }
        let vect_count = r.read_u16()? as usize;
        let mut columns = Vec::with_capacity(vect_count);
        for _ in 0..vect_count {
            columns.push(FrVect::from_payload(r)?);
        }
        if columns.len() != column_names.len() {
            return Err(Error::InvalidData(format!(
                "FrTable `{name}` has {} column names but {} columns",
                column_names.len(),
                columns.len()
            )));
        }
        Ok(Self { name, comment, n_row, column_names, columns })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vect::{Dimension, ElementType};

    #[test]
    fn column_count_must_match_name_count() {
        let bytes: Vec<u8> = (0..3i32).flat_map(|v| v.to_ne_bytes()).collect();
        let vect = FrVect::from_raw("snr", "", ElementType::Int4S, 3, vec![Dimension::new(3, 1.0, 0.0, "")], bytes).unwrap();
        let table = FrTable {
            name: "triggers".into(),
            comment: "".into(),
            n_row: 3,
            column_names: vec!["snr".into()],
            columns: vec![vect],
        };
        let bytes = table.to_payload();
        let mut r = PayloadReader::new(&bytes, 0);
        let parsed = FrTable::from_payload(&mut r).unwrap();
        assert_eq!(parsed.column_names, table.column_names);
    }
}
