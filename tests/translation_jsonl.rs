#[cfg(all(feature = "io-jsonl", feature = "compression-gzip"))]
mod translation_jsonl_tests {
    use anyhow::Result;
    use massive_wrangle::testing::{ArchiveBuilder, write_sample_archive};
    use massive_wrangle::{
        DatasetConfig, Record, Table, generate_translation_jsonl,
        generate_translation_jsonl_with, load_dataset, read_jsonl_records,
    };
    use serde_json::{Value, json};
    use std::fs;

    fn without_locale(table: &Table, locale: &str) -> Table {
        let idx = table.column_index("locale").unwrap();
        table.filter(|r| r[idx] != json!(locale))
    }

    #[test]
    fn one_pair_from_two_locales() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let archive = tmp.path().join("pair.tar.gz");
        ArchiveBuilder::new()
            .jsonl(
                "data/en-US.jsonl",
                &[r#"{"id":1,"locale":"en-US","utt":"hi"}"#],
            )
            .jsonl(
                "data/fr-FR.jsonl",
                &[r#"{"id":1,"locale":"fr-FR","utt":"salut"}"#],
            )
            .write(&archive)?;

        let table = load_dataset(&archive)?;
        let out = generate_translation_jsonl(&table, tmp.path())?;
        assert_eq!(out, tmp.path().join("combined_translation.jsonl"));

        let rows = read_jsonl_records(&out)?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], json!(1));
        assert_eq!(rows[0]["utt_x"], json!("hi"));
        assert_eq!(rows[0]["utt_y"], json!("salut"));
        assert_eq!(rows[0]["locale"], json!("fr-FR"));
        Ok(())
    }

    #[test]
    fn pairs_follow_locale_then_reference_order() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let archive = tmp.path().join("massive.tar.gz");
        write_sample_archive(&archive)?;
        let table = load_dataset(&archive)?;

        let rows = read_jsonl_records(generate_translation_jsonl(&table, tmp.path())?)?;
        let got: Vec<(Value, Value)> = rows
            .iter()
            .map(|r| (r["locale"].clone(), r["id"].clone()))
            .collect();
        assert_eq!(
            got,
            vec![
                (json!("fr-FR"), json!("1")),
                (json!("fr-FR"), json!("2")),
                (json!("de-DE"), json!("2")),
            ]
        );

        let keys: Vec<&str> = rows[0].keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            [
                "id",
                "utt_x",
                "annot_utt_x",
                "locale",
                "partition",
                "scenario",
                "intent",
                "utt_y",
                "annot_utt_y",
                "worker_id"
            ]
        );
        assert_eq!(rows[0]["utt_x"], json!("wake me up at five am"));
        assert_eq!(rows[0]["annot_utt_y"], json!("réveille-moi à [time : cinq heures]"));
        Ok(())
    }

    #[test]
    fn unmatched_ids_are_dropped() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let archive = tmp.path().join("massive.tar.gz");
        write_sample_archive(&archive)?;
        let table = load_dataset(&archive)?;

        let rows = read_jsonl_records(generate_translation_jsonl(&table, tmp.path())?)?;
        assert!(rows.iter().all(|r| r["id"] != json!("3") && r["id"] != json!("4")));
        Ok(())
    }

    #[test]
    fn non_ascii_is_written_literally() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let archive = tmp.path().join("massive.tar.gz");
        write_sample_archive(&archive)?;
        let table = load_dataset(&archive)?;

        let text = fs::read_to_string(generate_translation_jsonl(&table, tmp.path())?)?;
        assert!(text.contains("réveille-moi à cinq heures"));
        assert!(!text.contains("\\u00e9"));
        assert!(text.ends_with('\n'));
        assert_eq!(text.lines().count(), 3);
        Ok(())
    }

    #[test]
    fn reference_absent_still_writes_an_empty_file() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let archive = tmp.path().join("massive.tar.gz");
        write_sample_archive(&archive)?;
        let table = without_locale(&load_dataset(&archive)?, "en-US");

        let out = generate_translation_jsonl(&table, tmp.path())?;
        assert!(out.exists());
        assert_eq!(fs::read(&out)?.len(), 0);
        Ok(())
    }

    #[test]
    fn empty_table_with_locale_column_writes_an_empty_file() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let table = Table::new(vec!["id".into(), "locale".into()]);
        let out = generate_translation_jsonl(&table, tmp.path())?;
        assert_eq!(fs::read(&out)?.len(), 0);
        Ok(())
    }

    #[test]
    fn rerun_is_byte_identical() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let archive = tmp.path().join("massive.tar.gz");
        write_sample_archive(&archive)?;
        let table = load_dataset(&archive)?;

        let first = fs::read(generate_translation_jsonl(&table, tmp.path())?)?;
        let second = fs::read(generate_translation_jsonl(&table, tmp.path())?)?;
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn missing_output_dir_is_an_error() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let archive = tmp.path().join("massive.tar.gz");
        write_sample_archive(&archive)?;
        let table = load_dataset(&archive)?;
        assert!(generate_translation_jsonl(&table, tmp.path().join("missing")).is_err());
        Ok(())
    }

    #[test]
    fn missing_locale_column_is_a_lookup_error() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let rec: Record = json!({"id": "1", "utt": "hi"}).as_object().cloned().unwrap();
        let table = Table::from_records(vec![rec]);
        let err = generate_translation_jsonl(&table, tmp.path()).unwrap_err();
        assert!(err.to_string().contains("`locale`"));
        Ok(())
    }

    #[test]
    fn custom_config_renames_output_and_suffixes() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let archive = tmp.path().join("massive.tar.gz");
        write_sample_archive(&archive)?;
        let table = load_dataset(&archive)?;

        let mut cfg = DatasetConfig::default().with_join_suffixes("_en", "_tgt");
        cfg.combined_file_name = "pairs.jsonl".into();
        let out = generate_translation_jsonl_with(&table, tmp.path(), &cfg)?;
        assert_eq!(out, tmp.path().join("pairs.jsonl"));

        let rows = read_jsonl_records(&out)?;
        assert_eq!(rows[2]["utt_en"], json!("quiet"));
        assert_eq!(rows[2]["utt_tgt"], json!("ruhe"));
        Ok(())
    }
}
