//! XLSX writer

use std::fs::File;
use std::io::{Cursor, Seek, Write};
use std::path::Path;

use crate::error::{XlsxError, XlsxResult};
use crate::escape::escape_xml;
use billsheet_core::{column_letters, CellValue, Sheet};

/// Style index for the bold header row (see `STYLES_XML`)
const HEADER_XF: u32 = 1;

const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
    <fonts count="2">
        <font><sz val="11"/><name val="Calibri"/><family val="2"/></font>
        <font><b/><sz val="11"/><name val="Calibri"/><family val="2"/></font>
    </fonts>
    <fills count="2">
        <fill><patternFill patternType="none"/></fill>
        <fill><patternFill patternType="gray125"/></fill>
    </fills>
    <borders count="1">
        <border><left/><right/><top/><bottom/><diagonal/></border>
    </borders>
    <cellStyleXfs count="1">
        <xf numFmtId="0" fontId="0" fillId="0" borderId="0"/>
    </cellStyleXfs>
    <cellXfs count="2">
        <xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/>
        <xf numFmtId="0" fontId="1" fillId="0" borderId="0" xfId="0" applyFont="1"/>
    </cellXfs>
    <cellStyles count="1">
        <cellStyle name="Normal" xfId="0" builtinId="0"/>
    </cellStyles>
</styleSheet>"#;

/// XLSX file writer
///
/// Produces a workbook with exactly one worksheet: the header row in bold,
/// then one row per data row of the [`Sheet`].
pub struct XlsxWriter;

impl XlsxWriter {
    /// Write a sheet to a file path
    pub fn write_file<P: AsRef<Path>>(sheet: &Sheet, path: P) -> XlsxResult<()> {
        let file = File::create(path)?;
        Self::write(sheet, file)
    }

    /// Encode a sheet into an in-memory workbook buffer
    pub fn to_bytes(sheet: &Sheet) -> XlsxResult<Vec<u8>> {
        let mut buf = Vec::new();
        Self::write(sheet, Cursor::new(&mut buf))?;
        Ok(buf)
    }

    /// Write a sheet to a writer
    pub fn write<W: Write + Seek>(sheet: &Sheet, writer: W) -> XlsxResult<()> {
        let mut zip = zip::ZipWriter::new(writer);

        Self::write_part(&mut zip, "[Content_Types].xml", CONTENT_TYPES_XML)?;
        Self::write_part(&mut zip, "_rels/.rels", ROOT_RELS_XML)?;
        Self::write_part(&mut zip, "xl/workbook.xml", &Self::workbook_xml(sheet))?;
        Self::write_part(&mut zip, "xl/_rels/workbook.xml.rels", WORKBOOK_RELS_XML)?;
        Self::write_part(&mut zip, "xl/styles.xml", STYLES_XML)?;
        let worksheet = Self::worksheet_xml(sheet)?;
        Self::write_part(&mut zip, "xl/worksheets/sheet1.xml", &worksheet)?;

        zip.finish()?;
        log::debug!(
            "encoded sheet '{}' with {} data rows",
            sheet.name(),
            sheet.row_count()
        );
        Ok(())
    }

    fn write_part<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        name: &str,
        content: &str,
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file(name.to_string(), options)?;
        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn workbook_xml(sheet: &Sheet) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
    <sheets>
        <sheet name="{}" sheetId="1" r:id="rId1"/>
    </sheets>
</workbook>"#,
            escape_xml(sheet.name())
        )
    }

    fn worksheet_xml(sheet: &Sheet) -> XlsxResult<String> {
        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
        );

        content.push_str(&format!(
            "\n    <dimension ref=\"{}\"/>",
            Self::dimension(sheet)
        ));
        content.push_str("\n    <sheetData>");

        if sheet.column_count() > 0 {
            content.push_str("\n        <row r=\"1\">");
            for (col, title) in sheet.header().iter().enumerate() {
                Self::push_cell(
                    &mut content,
                    0,
                    col,
                    &CellValue::string(title.as_str()),
                    HEADER_XF,
                )?;
            }
            content.push_str("\n        </row>");

            for (i, row) in sheet.rows().iter().enumerate() {
                let row_idx = i + 1;
                content.push_str(&format!("\n        <row r=\"{}\">", row_idx + 1));
                for (col, value) in row.iter().enumerate() {
                    Self::push_cell(&mut content, row_idx, col, value, 0)?;
                }
                content.push_str("\n        </row>");
            }
        }

        content.push_str("\n    </sheetData>\n</worksheet>");
        Ok(content)
    }

    fn push_cell(
        content: &mut String,
        row: usize,
        col: usize,
        value: &CellValue,
        xf: u32,
    ) -> XlsxResult<()> {
        let cell_ref = format!("{}{}", column_letters(col as u16), row + 1);
        let style_attr = if xf != 0 {
            format!(" s=\"{}\"", xf)
        } else {
            String::new()
        };

        match value {
            CellValue::Number(n) if n.is_finite() => {
                content.push_str(&format!(
                    "\n            <c r=\"{}\"{}><v>{}</v></c>",
                    cell_ref, style_attr, n
                ));
            }
            // SpreadsheetML has no literal for inf or NaN
            CellValue::Number(n) => {
                return Err(XlsxError::InvalidFormat(format!(
                    "cannot encode non-finite number {} at {}",
                    n, cell_ref
                )));
            }
            CellValue::String(s) => {
                content.push_str(&format!(
                    "\n            <c r=\"{}\"{} t=\"inlineStr\"><is><t xml:space=\"preserve\">{}</t></is></c>",
                    cell_ref,
                    style_attr,
                    escape_xml(s)
                ));
            }
            CellValue::Empty => {}
        }
        Ok(())
    }

    /// The used range in A1 notation, `A1` for an empty sheet
    fn dimension(sheet: &Sheet) -> String {
        let cols = sheet.column_count();
        if cols == 0 {
            return "A1".to_string();
        }
        format!(
            "A1:{}{}",
            column_letters((cols - 1) as u16),
            sheet.row_count() + 1
        )
    }
}

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Default Extension="xml" ContentType="application/xml"/>
    <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
    <Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>
    <Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
</Types>"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

const WORKBOOK_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
    <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#;
