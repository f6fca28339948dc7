// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Business logic for building DOCX documents from inbound records.
//!
//! Responsibilities:
//! - Lay a record out as a title heading followed by either one body paragraph
//!   or a heading/paragraph pair per generic field.
//! - Package the layout into an in-memory Office Open XML (ZIP) document.
//! - Write a finished document to a user-chosen path.

use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use time::OffsetDateTime;
use time::macros::format_description;
use zip::{CompressionMethod, write::FileOptions};

use crate::models::inbound::InboundRecord;

/// MIME type of the exported artifact.
pub const MIME_TYPE: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

const WORD_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const APPLICATION: &str = "Vario Bot";

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/><Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/></Types>"#;

const PACKAGE_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/><Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/></Relationships>"#;

const DOCUMENT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="Calibri" w:hAnsi="Calibri" w:eastAsia="Calibri" w:cs="Calibri"/><w:sz w:val="22"/><w:szCs w:val="22"/><w:lang w:val="cs-CZ"/></w:rPr></w:rPrDefault><w:pPrDefault><w:pPr><w:spacing w:after="160" w:line="259" w:lineRule="auto"/></w:pPr></w:pPrDefault></w:docDefaults><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style><w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:uiPriority w:val="9"/><w:qFormat/><w:pPr><w:keepNext/><w:keepLines/><w:spacing w:before="480" w:after="0"/><w:outlineLvl w:val="0"/></w:pPr><w:rPr><w:b/><w:bCs/><w:color w:val="365F91"/><w:sz w:val="28"/><w:szCs w:val="28"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="Heading2"><w:name w:val="heading 2"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:uiPriority w:val="9"/><w:unhideWhenUsed/><w:qFormat/><w:pPr><w:keepNext/><w:keepLines/><w:spacing w:before="200" w:after="0"/><w:outlineLvl w:val="1"/></w:pPr><w:rPr><w:b/><w:bCs/><w:color w:val="4F81BD"/><w:sz w:val="26"/><w:szCs w:val="26"/></w:rPr></w:style></w:styles>"#;

/// One paragraph of the document layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DocParagraph<'a> {
    /// Heading paragraph; level 1 is the title, level 2 a generic field key.
    Heading { level: u8, text: &'a str },
    /// Plain body paragraph.
    Body(&'a str),
}

/// Lay out a record as document paragraphs.
///
/// The title heading always comes first. A resolved body text wins over the
/// generic fields, which are then dropped.
pub fn layout<'a>(record: &'a InboundRecord, default_title: &'a str) -> Vec<DocParagraph<'a>> {
    let mut paragraphs = vec![DocParagraph::Heading {
        level: 1,
        text: record.title().unwrap_or(default_title),
    }];

    match record.body() {
        Some(body) => paragraphs.push(DocParagraph::Body(body)),
        None => {
            for (key, value) in record.fields() {
                paragraphs.push(DocParagraph::Heading { level: 2, text: key });
                paragraphs.push(DocParagraph::Body(value));
            }
        }
    }

    paragraphs
}

/// Build an in-memory DOCX for `record`, using `default_title` when it has none.
///
/// Never touches the filesystem. Characters XML cannot carry are dropped, so any
/// record builds; errors only come from the in-memory ZIP/XML writers.
pub fn build_document(record: &InboundRecord, default_title: &str) -> Result<Vec<u8>> {
    let paragraphs = layout(record, default_title);
    let title = record.title().unwrap_or(default_title);

    let document_xml = document_xml(&paragraphs).context("Failed to render document body")?;
    let core_xml = core_properties_xml(title, OffsetDateTime::now_utc())
        .context("Failed to render document properties")?;
    let app_xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties"><Application>{APPLICATION}</Application></Properties>"#
    );

    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(CompressionMethod::Deflated);

    let parts: [(&str, &[u8]); 7] = [
        ("[Content_Types].xml", CONTENT_TYPES_XML.as_bytes()),
        ("_rels/.rels", PACKAGE_RELS_XML.as_bytes()),
        ("word/document.xml", &document_xml),
        ("word/styles.xml", STYLES_XML.as_bytes()),
        ("word/_rels/document.xml.rels", DOCUMENT_RELS_XML.as_bytes()),
        ("docProps/core.xml", &core_xml),
        ("docProps/app.xml", app_xml.as_bytes()),
    ];
    for (name, bytes) in parts {
        zip.start_file(name, options)
            .with_context(|| format!("Failed to add {name} to document"))?;
        zip.write_all(bytes)
            .with_context(|| format!("Failed to write {name} into document"))?;
    }

    let cursor = zip.finish().context("Failed to finalize document")?;
    Ok(cursor.into_inner())
}

/// Build the document for `record` and write it to `output`.
///
/// Parent directories for `output` are created if missing.
pub fn write_document(output: &Path, record: &InboundRecord, default_title: &str) -> Result<()> {
    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory {:?}", parent))?;
    }

    let bytes = build_document(record, default_title)?;
    fs::write(output, bytes)
        .with_context(|| format!("Failed to write document file {:?}", output))?;
    Ok(())
}

/// Force a specific extension onto a path when it is missing or different.
///
/// Keeps existing matching extension (case-insensitive); otherwise replaces it.
pub fn ensure_extension(mut path: PathBuf, extension: &str) -> PathBuf {
    let replace = !matches!(
        path.extension().and_then(|e| e.to_str()),
        Some(ext) if ext.eq_ignore_ascii_case(extension)
    );

    if replace {
        path.set_extension(extension);
    }
    path
}

fn document_xml(paragraphs: &[DocParagraph<'_>]) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    writer.write_event(Event::Start(
        BytesStart::new("w:document").with_attributes([("xmlns:w", WORD_NS)]),
    ))?;
    writer.write_event(Event::Start(BytesStart::new("w:body")))?;

    for paragraph in paragraphs {
        match paragraph {
            DocParagraph::Heading { level, text } => {
                write_paragraph(&mut writer, Some(&format!("Heading{level}")), text)?
            }
            DocParagraph::Body(text) => write_paragraph(&mut writer, None, text)?,
        }
    }

    // A4 portrait with 2.54 cm margins.
    writer.write_event(Event::Start(BytesStart::new("w:sectPr")))?;
    writer.write_event(Event::Empty(
        BytesStart::new("w:pgSz").with_attributes([("w:w", "11906"), ("w:h", "16838")]),
    ))?;
    writer.write_event(Event::Empty(BytesStart::new("w:pgMar").with_attributes([
        ("w:top", "1440"),
        ("w:right", "1440"),
        ("w:bottom", "1440"),
        ("w:left", "1440"),
        ("w:header", "708"),
        ("w:footer", "708"),
        ("w:gutter", "0"),
    ])))?;
    writer.write_event(Event::End(BytesEnd::new("w:sectPr")))?;

    writer.write_event(Event::End(BytesEnd::new("w:body")))?;
    writer.write_event(Event::End(BytesEnd::new("w:document")))?;
    Ok(writer.into_inner())
}

/// Write one `<w:p>` with an optional paragraph style.
///
/// Newlines become `<w:br/>` and tabs `<w:tab/>` inside a single run.
fn write_paragraph<W: Write>(writer: &mut Writer<W>, style: Option<&str>, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("w:p")))?;

    if let Some(style) = style {
        writer.write_event(Event::Start(BytesStart::new("w:pPr")))?;
        writer.write_event(Event::Empty(
            BytesStart::new("w:pStyle").with_attributes([("w:val", style)]),
        ))?;
        writer.write_event(Event::End(BytesEnd::new("w:pPr")))?;
    }

    let text = xml_safe(text);
    if !text.is_empty() {
        writer.write_event(Event::Start(BytesStart::new("w:r")))?;
        for (idx, line) in text.split('\n').enumerate() {
            if idx > 0 {
                writer.write_event(Event::Empty(BytesStart::new("w:br")))?;
            }
            for (tab_idx, chunk) in line.split('\t').enumerate() {
                if tab_idx > 0 {
                    writer.write_event(Event::Empty(BytesStart::new("w:tab")))?;
                }
                if chunk.is_empty() {
                    continue;
                }
                writer.write_event(Event::Start(
                    BytesStart::new("w:t").with_attributes([("xml:space", "preserve")]),
                ))?;
                writer.write_event(Event::Text(BytesText::new(chunk)))?;
                writer.write_event(Event::End(BytesEnd::new("w:t")))?;
            }
        }
        writer.write_event(Event::End(BytesEnd::new("w:r")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("w:p")))?;
    Ok(())
}

fn core_properties_xml(title: &str, created: OffsetDateTime) -> Result<Vec<u8>> {
    let timestamp = created
        .format(format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second]Z"
        ))
        .context("Failed to format creation timestamp")?;

    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    writer.write_event(Event::Start(
        BytesStart::new("cp:coreProperties").with_attributes([
            (
                "xmlns:cp",
                "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
            ),
            ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
            ("xmlns:dcterms", "http://purl.org/dc/terms/"),
            ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
        ]),
    ))?;

    write_text_element(&mut writer, BytesStart::new("dc:title"), &xml_safe(title))?;
    write_text_element(&mut writer, BytesStart::new("dc:creator"), APPLICATION)?;
    write_text_element(
        &mut writer,
        BytesStart::new("dcterms:created").with_attributes([("xsi:type", "dcterms:W3CDTF")]),
        &timestamp,
    )?;

    writer.write_event(Event::End(BytesEnd::new("cp:coreProperties")))?;
    Ok(writer.into_inner())
}

fn write_text_element<W: Write>(writer: &mut Writer<W>, start: BytesStart<'_>, text: &str) -> Result<()> {
    let end = start.to_end().into_owned();
    writer.write_event(Event::Start(start))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(end))?;
    Ok(())
}

/// Drop characters XML 1.0 cannot represent and normalize line endings to `\n`.
fn xml_safe(text: &str) -> String {
    text.replace("\r\n", "\n")
        .chars()
        .map(|c| if c == '\r' { '\n' } else { c })
        .filter(|c| {
            matches!(
                c,
                '\t' | '\n' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::io::Read;
    use std::path::PathBuf;

    use quick_xml::Reader;
    use quick_xml::events::Event;
    use serde_json::json;
    use zip::ZipArchive;

    use super::*;
    use crate::logic::payload::decode_record;

    fn build_text_document(title: &str, text: &str, default_title: &str) -> Result<Vec<u8>> {
        build_document(&InboundRecord::with_text(title, text), default_title)
    }

    fn record(value: serde_json::Value) -> InboundRecord {
        InboundRecord::from_map(value.as_object().unwrap())
    }

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut buf = String::new();
        file.read_to_string(&mut buf).unwrap();
        buf
    }

    /// Paragraph styles and texts in document order.
    fn paragraphs(bytes: &[u8]) -> Vec<(Option<String>, String)> {
        let xml = read_part(bytes, "word/document.xml");
        let mut reader = Reader::from_str(&xml);
        let mut out = Vec::new();
        let mut style = None;
        let mut text = String::new();
        let mut in_text = false;

        loop {
            match reader.read_event().unwrap() {
                Event::Start(e) if e.name().as_ref() == b"w:p" => {
                    style = None;
                    text.clear();
                }
                Event::Start(e) if e.name().as_ref() == b"w:t" => in_text = true,
                Event::End(e) if e.name().as_ref() == b"w:t" => in_text = false,
                Event::Empty(e) if e.name().as_ref() == b"w:pStyle" => {
                    style = e
                        .try_get_attribute("w:val")
                        .unwrap()
                        .map(|a| a.unescape_value().unwrap().into_owned());
                }
                Event::Empty(e) if e.name().as_ref() == b"w:br" => text.push('\n'),
                Event::Empty(e) if e.name().as_ref() == b"w:tab" => text.push('\t'),
                Event::Text(t) if in_text => text.push_str(&t.unescape().unwrap()),
                Event::End(e) if e.name().as_ref() == b"w:p" => {
                    out.push((style.take(), std::mem::take(&mut text)));
                }
                Event::Eof => break,
                _ => {}
            }
        }
        out
    }

    fn heading(level: u8, text: &str) -> (Option<String>, String) {
        (Some(format!("Heading{level}")), text.to_string())
    }

    fn body(text: &str) -> (Option<String>, String) {
        (None, text.to_string())
    }

    #[test]
    fn module_and_text_produce_title_and_single_paragraph() {
        let bytes = build_document(&record(json!({"module": "Sklad", "Text": "Hello"})), "Vario modul")
            .unwrap();

        assert_eq!(paragraphs(&bytes), vec![heading(1, "Sklad"), body("Hello")]);
    }

    #[test]
    fn generic_fields_become_subsections_in_key_order() {
        let bytes =
            build_document(&record(json!({"foo": "bar", "baz": "qux"})), "Vario modul").unwrap();

        assert_eq!(
            paragraphs(&bytes),
            vec![
                heading(1, "Vario modul"),
                heading(2, "foo"),
                body("bar"),
                heading(2, "baz"),
                body("qux"),
            ]
        );
    }

    #[test]
    fn body_text_drops_extra_fields() {
        let rec = record(json!({"module": "M", "result": "R", "extra": "ignored"}));

        assert_eq!(
            layout(&rec, "Vario modul"),
            vec![
                DocParagraph::Heading { level: 1, text: "M" },
                DocParagraph::Body("R"),
            ]
        );
    }

    #[test]
    fn non_string_values_are_stringified() {
        let bytes = build_document(&record(json!({"count": 3, "tags": ["a", "b"]})), "T").unwrap();

        assert_eq!(
            paragraphs(&bytes),
            vec![
                heading(1, "T"),
                heading(2, "count"),
                body("3"),
                heading(2, "tags"),
                body(r#"["a","b"]"#),
            ]
        );
    }

    #[test]
    fn line_breaks_and_tabs_are_kept() {
        let bytes = build_text_document("Výstup z Make", "line one\r\nline\ttwo", "Vario modul")
            .unwrap();

        assert_eq!(
            paragraphs(&bytes),
            vec![heading(1, "Výstup z Make"), body("line one\nline\ttwo")]
        );
    }

    #[test]
    fn markup_characters_are_escaped_and_control_chars_dropped() {
        let bytes = build_text_document("<b>&", "a < b & c\u{0}\u{7}", "Vario modul").unwrap();

        assert_eq!(
            paragraphs(&bytes),
            vec![heading(1, "<b>&"), body("a < b & c")]
        );
    }

    #[test]
    fn package_contains_required_parts() {
        let bytes = build_text_document("Title", "Body", "Vario modul").unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        let names: Vec<String> = archive.file_names().map(str::to_string).collect();

        for part in [
            "[Content_Types].xml",
            "_rels/.rels",
            "word/document.xml",
            "word/styles.xml",
            "word/_rels/document.xml.rels",
            "docProps/core.xml",
            "docProps/app.xml",
        ] {
            assert!(names.iter().any(|n| n == part), "missing {part}");
        }
        assert!(archive.by_name("word/styles.xml").is_ok());

        let core = read_part(&bytes, "docProps/core.xml");
        assert!(core.contains("<dc:title>Title</dc:title>"));
        assert!(core.contains("dcterms:W3CDTF"));
    }

    #[test]
    fn decoded_payloads_always_build() {
        for raw in [
            "%7B%22result%22%3A%22hi%22%7D",
            "%7B%7D",
            "%7B%22module%22%3Anull%2C%22n%22%3A1.5%7D",
            r#"{"nested":{"a":[1,2,{"b":null}]},"module":"X"}"#,
        ] {
            let record = decode_record(Some(raw)).unwrap();
            let bytes = build_document(&record, "Vario modul").unwrap();
            assert!(!bytes.is_empty(), "empty document for {raw}");
        }
    }

    #[test]
    fn write_document_creates_parent_directories() {
        let tmp = tempfile::TempDir::new().unwrap();
        let out = tmp.path().join("nested").join("landing_page.docx");

        write_document(&out, &InboundRecord::with_text("T", "B"), "Vario modul").unwrap();

        let bytes = std::fs::read(&out).unwrap();
        assert_eq!(paragraphs(&bytes), vec![heading(1, "T"), body("B")]);
    }

    // Should leave an existing matching extension untouched, ignoring case.
    #[test]
    fn ensure_extension_preserves_matching_extension_case_insensitive() {
        let path = PathBuf::from("/tmp/report.DOCX");
        let result = ensure_extension(path.clone(), "docx");

        assert_eq!(result, path);
    }

    // Should replace an unmatched extension with the requested one.
    #[test]
    fn ensure_extension_replaces_when_different() {
        let path = PathBuf::from("report.txt");
        let result = ensure_extension(path, "docx");

        assert_eq!(result.extension().and_then(|e| e.to_str()), Some("docx"));
    }
}
