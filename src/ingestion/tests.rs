use super::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_catalog(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("should create temp file");
    file.write_all(content.as_bytes())
        .expect("should write catalog");
    file.flush().expect("should flush catalog");
    file
}

#[test]
fn loads_one_document_per_row() {
    let file = write_catalog(
        "brand,name,price,mrp,offer\n\
         Allen Solly,Slim Fit Shirt,₹499.00,₹999.00,50% off\n\
         Raymond,Formal Shirt,₹899.00,₹1299.00,30% off\n",
    );

    let docs = CatalogLoader::load(file.path()).expect("load should succeed");
    assert_eq!(docs.len(), 2);

    assert_eq!(
        docs[0].text,
        "brand: Allen Solly\nname: Slim Fit Shirt\nprice: ₹499.00\nmrp: ₹999.00\noffer: 50% off"
    );
    assert_eq!(docs[0].row(), Some(0));
    assert_eq!(docs[1].row(), Some(1));
    assert_eq!(
        docs[0].metadata.get("source"),
        Some(&file.path().display().to_string())
    );
}

#[test]
fn quoted_fields_are_preserved() {
    let file = write_catalog(
        "brand,name,price\n\
         \"Peter England\",\"Checked, Casual Shirt\",₹650.00\n",
    );

    let docs = CatalogLoader::load(file.path()).expect("load should succeed");
    assert_eq!(docs.len(), 1);
    assert!(docs[0].text.contains("name: Checked, Casual Shirt"));
}

#[test]
fn empty_file_fails() {
    let file = write_catalog("");
    let result = CatalogLoader::load(file.path());
    assert!(matches!(result, Err(ChatbotError::Ingestion(_))));
}

#[test]
fn header_only_file_fails() {
    let file = write_catalog("brand,name,price\n");
    let result = CatalogLoader::load(file.path());
    assert!(matches!(result, Err(ChatbotError::Ingestion(_))));
}

#[test]
fn missing_file_fails() {
    let result = CatalogLoader::load(std::path::Path::new("/nonexistent/catalog.csv"));
    assert!(matches!(result, Err(ChatbotError::Ingestion(_))));
}

#[test]
fn malformed_rows_are_skipped() {
    let file = write_catalog(
        "brand,name,price\n\
         Raymond,Formal Shirt,₹899.00\n\
         Allen Solly,extra,fields,here\n",
    );

    let docs = CatalogLoader::load(file.path()).expect("load should succeed");
    assert_eq!(docs.len(), 1);
    assert!(docs[0].text.contains("brand: Raymond"));
}
