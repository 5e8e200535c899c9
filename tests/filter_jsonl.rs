#[cfg(all(feature = "io-xlsx", feature = "io-jsonl"))]
mod filter_jsonl_tests {
    use anyhow::Result;
    use massive_wrangle::{Table, filter_into_jsonl, read_jsonl_records, write_xlsx_table};
    use serde_json::{Value, json};
    use std::fs;
    use std::path::{Path, PathBuf};

    fn mixed_sheet(dir: &Path) -> Result<PathBuf> {
        let path = dir.join("mixed.xlsx");
        let rows = vec![
            vec![json!("1"), json!("en-US"), json!("hi"), json!(1)],
            vec![json!("1"), json!("fr-FR"), json!("salut"), json!(1)],
            vec![json!("2"), json!("de-DE"), json!("hallo"), json!(2)],
            vec![json!("3"), json!("fr-FR"), json!("bonjour"), json!(3)],
            vec![json!("4"), json!("fr-FR"), json!("ça va"), Value::Null],
            vec![json!("5"), json!("en-US"), json!("how are you"), json!(3)],
        ];
        let table = Table::from_rows(
            vec!["id".into(), "locale".into(), "utt".into(), "rating".into()],
            rows,
        )?;
        write_xlsx_table(&path, &table)?;
        Ok(path)
    }

    #[test]
    fn keeps_only_matching_rows_in_order() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let sheet = mixed_sheet(tmp.path())?;

        let out = filter_into_jsonl(&sheet, tmp.path(), "locale", "fr-FR")?;
        assert_eq!(out, tmp.path().join("fr-FR.jsonl"));

        let rows = read_jsonl_records(&out)?;
        let ids: Vec<&Value> = rows.iter().map(|r| &r["id"]).collect();
        assert_eq!(ids, vec![&json!("1"), &json!("3"), &json!("4")]);
        assert!(rows.iter().all(|r| r["locale"] == json!("fr-FR")));
        assert_eq!(rows[2]["utt"], json!("ça va"));
        assert_eq!(rows[2]["rating"], Value::Null);
        Ok(())
    }

    #[test]
    fn output_keeps_sheet_column_order_and_literal_text() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let sheet = mixed_sheet(tmp.path())?;

        let out = filter_into_jsonl(&sheet, tmp.path(), "locale", "fr-FR")?;
        let text = fs::read_to_string(out)?;
        let first = text.lines().next().unwrap();
        assert_eq!(first, r#"{"id":"1","locale":"fr-FR","utt":"salut","rating":1}"#);
        assert!(text.contains("ça va"));
        Ok(())
    }

    #[test]
    fn no_match_writes_an_empty_file() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let sheet = mixed_sheet(tmp.path())?;

        let out = filter_into_jsonl(&sheet, tmp.path(), "locale", "ja-JP")?;
        assert!(out.exists());
        assert_eq!(fs::read(&out)?.len(), 0);
        Ok(())
    }

    #[test]
    fn equality_is_type_sensitive() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let sheet = mixed_sheet(tmp.path())?;

        let by_number = filter_into_jsonl(&sheet, tmp.path(), "rating", 3)?;
        assert_eq!(by_number, tmp.path().join("3.jsonl"));
        assert_eq!(read_jsonl_records(&by_number)?.len(), 2);

        let by_text = filter_into_jsonl(&sheet, tmp.path(), "rating", "3")?;
        assert_eq!(by_text, tmp.path().join("3.jsonl"));
        assert!(read_jsonl_records(&by_text)?.is_empty());

        let ids = filter_into_jsonl(&sheet, tmp.path(), "id", 1)?;
        assert!(read_jsonl_records(&ids)?.is_empty());
        Ok(())
    }

    #[test]
    fn missing_filter_column_is_a_lookup_error() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let sheet = mixed_sheet(tmp.path())?;

        let err = filter_into_jsonl(&sheet, tmp.path(), "scenario", "alarm").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("`scenario`"), "{msg}");
        assert!(msg.contains("locale"), "{msg}");
        assert!(!tmp.path().join("alarm.jsonl").exists());
        Ok(())
    }

    #[test]
    fn unreadable_spreadsheet_is_an_error() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let bogus = tmp.path().join("bogus.xlsx");
        fs::write(&bogus, b"definitely not a zip")?;
        assert!(filter_into_jsonl(&bogus, tmp.path(), "locale", "fr-FR").is_err());
        Ok(())
    }

    #[test]
    fn rerun_is_byte_identical() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let sheet = mixed_sheet(tmp.path())?;

        let first = fs::read(filter_into_jsonl(&sheet, tmp.path(), "locale", "en-US")?)?;
        let second = fs::read(filter_into_jsonl(&sheet, tmp.path(), "locale", "en-US")?)?;
        assert_eq!(first, second);
        assert_eq!(String::from_utf8(first)?.lines().count(), 2);
        Ok(())
    }
}
