//! XLSX reader
//!
//! Loads the first worksheet of a workbook into a [`Sheet`]: row 1 becomes
//! the header, every later row a data row. Styles are ignored.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use crate::escape::decode_excel_escapes;
use billsheet_core::{CellValue, Sheet, MAX_COLS, MAX_ROWS};

/// XLSX file reader
pub struct XlsxReader;

impl XlsxReader {
    /// Read the first sheet from a file path
    pub fn read_file<P: AsRef<Path>>(path: P) -> XlsxResult<Sheet> {
        let file = File::open(path)?;
        Self::read(file)
    }

    /// Read the first sheet from a reader
    pub fn read<R: Read + Seek>(reader: R) -> XlsxResult<Sheet> {
        let mut archive = zip::ZipArchive::new(reader)?;

        // Verify this is an XLSX file
        if read_part(&mut archive, "[Content_Types].xml")?.is_none() {
            return Err(XlsxError::InvalidFormat(
                "Missing [Content_Types].xml".into(),
            ));
        }

        let shared_strings = match read_part(&mut archive, "xl/sharedStrings.xml")? {
            Some(xml) => Self::parse_shared_strings(&xml)?,
            None => Vec::new(),
        };

        let workbook_xml = read_part(&mut archive, "xl/workbook.xml")?
            .ok_or_else(|| XlsxError::MissingPart("xl/workbook.xml".into()))?;
        let (sheet_name, r_id) = Self::parse_first_sheet(&workbook_xml)?;

        let rels_xml = read_part(&mut archive, "xl/_rels/workbook.xml.rels")?
            .ok_or_else(|| XlsxError::MissingPart("xl/_rels/workbook.xml.rels".into()))?;
        let sheet_path = Self::parse_sheet_target(&rels_xml, &r_id)?;

        let sheet_xml = read_part(&mut archive, &sheet_path)?
            .ok_or_else(|| XlsxError::MissingPart(sheet_path.clone()))?;
        let cells = Self::parse_cells(&sheet_xml, &shared_strings)?;

        let sheet = Self::build_sheet(&sheet_name, cells)?;
        log::debug!(
            "read sheet '{}' with {} data rows from {}",
            sheet.name(),
            sheet.row_count(),
            sheet_path
        );
        Ok(sheet)
    }

    fn parse_shared_strings(xml: &str) -> XlsxResult<Vec<String>> {
        let mut reader = Reader::from_str(xml);
        let mut strings = Vec::new();
        let mut current = String::new();
        let mut in_si = false;
        let mut in_t = false;

        loop {
            match reader.read_event()? {
                Event::Start(e) => match e.name().as_ref() {
                    b"si" => {
                        in_si = true;
                        current.clear();
                    }
                    b"t" if in_si => in_t = true,
                    _ => {}
                },
                Event::End(e) => match e.name().as_ref() {
                    b"si" => {
                        strings.push(decode_excel_escapes(&current));
                        in_si = false;
                    }
                    b"t" => in_t = false,
                    _ => {}
                },
                Event::Text(e) if in_t => current.push_str(&e.unescape()?),
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(strings)
    }

    /// Name and relationship id of the first `<sheet>` in workbook.xml
    fn parse_first_sheet(xml: &str) -> XlsxResult<(String, String)> {
        let mut reader = Reader::from_str(xml);

        loop {
            match reader.read_event()? {
                Event::Start(e) | Event::Empty(e) if e.name().as_ref() == b"sheet" => {
                    let name = attribute(&e, b"name")?.unwrap_or_default();
                    let r_id = attribute(&e, b"r:id")?.ok_or_else(|| {
                        XlsxError::InvalidFormat("sheet element without r:id".into())
                    })?;
                    return Ok((name, r_id));
                }
                Event::Eof => {
                    return Err(XlsxError::InvalidFormat("workbook has no sheets".into()))
                }
                _ => {}
            }
        }
    }

    /// Zip path of the worksheet part with relationship id `r_id`
    fn parse_sheet_target(xml: &str, r_id: &str) -> XlsxResult<String> {
        let mut reader = Reader::from_str(xml);

        loop {
            match reader.read_event()? {
                Event::Start(e) | Event::Empty(e) if e.name().as_ref() == b"Relationship" => {
                    if attribute(&e, b"Id")?.as_deref() != Some(r_id) {
                        continue;
                    }
                    let target = attribute(&e, b"Target")?.ok_or_else(|| {
                        XlsxError::InvalidFormat(format!("relationship {} has no target", r_id))
                    })?;
                    return Ok(match target.strip_prefix('/') {
                        Some(absolute) => absolute.to_string(),
                        None => format!("xl/{}", target),
                    });
                }
                Event::Eof => {
                    return Err(XlsxError::MissingPart(format!("relationship {}", r_id)))
                }
                _ => {}
            }
        }
    }

    /// All non-empty cells keyed by (row, col), 0-based
    fn parse_cells(
        xml: &str,
        shared_strings: &[String],
    ) -> XlsxResult<BTreeMap<(usize, usize), CellValue>> {
        let mut reader = Reader::from_str(xml);
        let mut cells = BTreeMap::new();

        let mut current: Option<(usize, usize)> = None;
        let mut cell_type = String::new();
        let mut text = String::new();
        let mut in_text = false;
        let mut next_row = 0usize;
        let mut next_col = 0usize;

        loop {
            match reader.read_event()? {
                Event::Start(e) if e.name().as_ref() == b"row" => {
                    if let Some(r) = attribute(&e, b"r")? {
                        next_row = parse_row_number(&r)?;
                    }
                    next_col = 0;
                }
                Event::End(e) if e.name().as_ref() == b"row" => {
                    next_row = next_row.saturating_add(1);
                }
                Event::Start(e) if e.name().as_ref() == b"c" => {
                    let pos = match attribute(&e, b"r")? {
                        Some(r) => parse_cell_ref(&r)?,
                        None => (next_row, next_col),
                    };
                    next_col = pos.1 + 1;
                    current = Some(pos);
                    cell_type = attribute(&e, b"t")?.unwrap_or_default();
                    text.clear();
                }
                Event::Empty(e) if e.name().as_ref() == b"c" => {
                    if let Some(r) = attribute(&e, b"r")? {
                        next_col = parse_cell_ref(&r)?.1 + 1;
                    } else {
                        next_col = next_col.saturating_add(1);
                    }
                }
                Event::Start(e) if matches!(e.name().as_ref(), b"v" | b"t") => in_text = true,
                Event::End(e) if matches!(e.name().as_ref(), b"v" | b"t") => in_text = false,
                Event::Text(e) if in_text => text.push_str(&e.unescape()?),
                Event::End(e) if e.name().as_ref() == b"c" => {
                    if let Some(pos) = current.take() {
                        let value = cell_value(&cell_type, &text, shared_strings)?;
                        if !value.is_empty() {
                            cells.insert(pos, value);
                        }
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(cells)
    }

    fn build_sheet(name: &str, cells: BTreeMap<(usize, usize), CellValue>) -> XlsxResult<Sheet> {
        let width = cells.keys().map(|&(_, col)| col + 1).max().unwrap_or(0);
        let height = cells.keys().map(|&(row, _)| row + 1).max().unwrap_or(0);

        let header = (0..width)
            .map(|col| match cells.get(&(0, col)) {
                Some(value) => value.to_string(),
                None => String::new(),
            })
            .collect();
        let mut sheet = Sheet::new(name, header)?;

        for row in 1..height {
            let values = (0..width)
                .map(|col| cells.get(&(row, col)).cloned().unwrap_or_default())
                .collect();
            sheet.push_row(values)?;
        }

        Ok(sheet)
    }
}

/// Read a zip entry as UTF-8 text, `None` if the entry does not exist
fn read_part<R: Read + Seek>(
    archive: &mut zip::ZipArchive<R>,
    name: &str,
) -> XlsxResult<Option<String>> {
    let mut file = match archive.by_name(name) {
        Ok(f) => f,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut content = String::new();
    file.read_to_string(&mut content)?;
    Ok(Some(content))
}

fn attribute(e: &BytesStart<'_>, key: &[u8]) -> XlsxResult<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.as_ref() == key {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn cell_value(cell_type: &str, text: &str, shared_strings: &[String]) -> XlsxResult<CellValue> {
    let value = match cell_type {
        "s" => {
            let idx: usize = text.trim().parse().map_err(|_| {
                XlsxError::InvalidFormat(format!("invalid shared string index '{}'", text))
            })?;
            let s = shared_strings.get(idx).ok_or_else(|| {
                XlsxError::InvalidFormat(format!("shared string {} out of range", idx))
            })?;
            CellValue::string(s.as_str())
        }
        "inlineStr" | "str" | "e" => CellValue::string(decode_excel_escapes(text)),
        _ if text.trim().is_empty() => CellValue::Empty,
        _ => {
            let n: f64 = text.trim().parse().map_err(|_| {
                XlsxError::InvalidFormat(format!("invalid number '{}'", text))
            })?;
            CellValue::Number(n)
        }
    };
    Ok(value)
}

/// Parse an A1 reference into 0-based (row, col)
fn parse_cell_ref(s: &str) -> XlsxResult<(usize, usize)> {
    let invalid = || XlsxError::InvalidFormat(format!("invalid cell reference '{}'", s));

    let split = s.find(|c: char| c.is_ascii_digit()).ok_or_else(invalid)?;
    let (letters, digits) = s.split_at(split);

    if letters.is_empty() || !letters.bytes().all(|b| b.is_ascii_alphabetic()) {
        return Err(invalid());
    }

    let mut col = 0usize;
    for b in letters.bytes() {
        col = col
            .checked_mul(26)
            .and_then(|acc| acc.checked_add((b.to_ascii_uppercase() - b'A') as usize + 1))
            .filter(|&n| n <= MAX_COLS as usize)
            .ok_or_else(invalid)?;
    }

    let row = parse_row_number(digits)?;
    Ok((row, col - 1))
}

/// Parse a 1-based row number into a 0-based index
fn parse_row_number(s: &str) -> XlsxResult<usize> {
    match s.parse::<u32>() {
        Ok(n) if (1..=MAX_ROWS).contains(&n) => Ok(n as usize - 1),
        _ => Err(XlsxError::InvalidFormat(format!("invalid row number '{}'", s))),
    }
}
