//! End-of-run artifacts: the Arrow table, `vocab.txt` and `duration.json`.
//!
//! The table directory follows the layout `datasets.Dataset.save_to_disk`
//! produces, so training code can open it with `load_from_disk`.

use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

use arrow_array::{ArrayRef, Float64Array, RecordBatch, StringArray};
use arrow_ipc::writer::StreamWriter;
use arrow_schema::{DataType, Field, Schema};
use serde::Serialize;
use serde_json::{json, ser::PrettyFormatter, Value};
use sha2::{Digest, Sha256};

use crate::error::PrepareResult;

/// Arrow shard name used for single-shard datasets.
pub const DATA_FILE: &str = "data-00000-of-00001.arrow";

/// An accepted, re-encoded clip.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Absolute path of the re-encoded file.
    pub audio_path: PathBuf,
    /// Output file name, the key in `duration.json`.
    pub file_name: String,
    pub text: String,
    pub duration: f64,
}

/// Rows collected during a run, in acceptance order.
#[derive(Debug, Clone, Default)]
pub struct DatasetTable {
    samples: Vec<Sample>,
}

impl DatasetTable {
    pub fn push(&mut self, sample: Sample) {
        self.samples.push(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Unique characters over all texts, in code point order.
    pub fn vocab(&self) -> Vec<char> {
        let set: BTreeSet<char> = self.samples.iter().flat_map(|s| s.text.chars()).collect();
        set.into_iter().collect()
    }

    pub fn duration_map(&self) -> BTreeMap<&str, f64> {
        self.samples
            .iter()
            .map(|s| (s.file_name.as_str(), s.duration))
            .collect()
    }

    /// Write the table as an on-disk dataset into `dir`.
    pub fn save_to_disk(&self, dir: &Path) -> PrepareResult<()> {
        fs::create_dir_all(dir)?;

        let features = features_json();
        let schema = Arc::new(
            Schema::new(vec![
                Field::new("audio_path", DataType::Utf8, true),
                Field::new("text", DataType::Utf8, true),
                Field::new("duration", DataType::Float64, true),
            ])
            .with_metadata(HashMap::from([(
                "huggingface".to_string(),
                json!({ "info": { "features": features.clone() } }).to_string(),
            )])),
        );

        let paths: Vec<String> = self
            .samples
            .iter()
            .map(|s| s.audio_path.to_string_lossy().into_owned())
            .collect();
        let texts: Vec<&str> = self.samples.iter().map(|s| s.text.as_str()).collect();
        let durations: Vec<f64> = self.samples.iter().map(|s| s.duration).collect();

        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(paths)) as ArrayRef,
                Arc::new(StringArray::from(texts)) as ArrayRef,
                Arc::new(Float64Array::from(durations)) as ArrayRef,
            ],
        )?;

        let file = BufWriter::new(File::create(dir.join(DATA_FILE))?);
        let mut writer = StreamWriter::try_new(file, &schema)?;
        writer.write(&batch)?;
        writer.finish()?;

        let info = json!({
            "citation": "",
            "description": "",
            "features": features,
            "homepage": "",
            "license": "",
        });
        write_json(&dir.join("dataset_info.json"), &info)?;

        let state = json!({
            "_data_files": [{ "filename": DATA_FILE }],
            "_fingerprint": self.fingerprint(),
            "_format_columns": null,
            "_format_kwargs": {},
            "_format_type": null,
            "_output_all_columns": false,
            "_split": null,
        });
        write_json(&dir.join("state.json"), &state)?;
        Ok(())
    }

    /// One character per line, line number == vocabulary index.
    pub fn write_vocab(&self, path: &Path) -> PrepareResult<()> {
        let mut out = BufWriter::new(File::create(path)?);
        for c in self.vocab() {
            writeln!(out, "{c}")?;
        }
        out.flush()?;
        Ok(())
    }

    pub fn write_duration_map(&self, path: &Path) -> PrepareResult<()> {
        #[derive(Serialize)]
        struct DurationFile<'a> {
            duration: BTreeMap<&'a str, f64>,
        }
        write_json(
            path,
            &DurationFile {
                duration: self.duration_map(),
            },
        )
    }

    // Short content hash, stable across runs with identical rows.
    fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for s in &self.samples {
            hasher.update(s.audio_path.to_string_lossy().as_bytes());
            hasher.update([0u8]);
            hasher.update(s.text.as_bytes());
            hasher.update([0u8]);
            hasher.update(s.duration.to_le_bytes());
        }
        hex::encode(hasher.finalize())[..16].to_string()
    }
}

fn features_json() -> Value {
    json!({
        "audio_path": { "dtype": "string", "_type": "Value" },
        "text": { "dtype": "string", "_type": "Value" },
        "duration": { "dtype": "float64", "_type": "Value" },
    })
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> PrepareResult<()> {
    let mut out = BufWriter::new(File::create(path)?);
    let mut ser = serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut ser)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow_array::Array;
    use arrow_ipc::reader::StreamReader;

    fn sample(name: &str, text: &str, duration: f64) -> Sample {
        Sample {
            audio_path: PathBuf::from(format!("/out/wavs_processed/{name}")),
            file_name: name.to_string(),
            text: text.to_string(),
            duration,
        }
    }

    fn table() -> DatasetTable {
        let mut t = DatasetTable::default();
        t.push(sample("f5_a.wav", "olá mundo", 2.0));
        t.push(sample("f5_b.wav", "bom dia", 1.25));
        t
    }

    #[test]
    fn test_vocab_sorted_unique() {
        let vocab = table().vocab();
        let expected: Vec<char> = vec![' ', 'a', 'b', 'd', 'i', 'l', 'm', 'n', 'o', 'u', 'á'];
        assert_eq!(vocab, expected);
    }

    #[test]
    fn test_vocab_file_one_char_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vocab.txt");
        table().write_vocab(&path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.split_terminator('\n').collect();
        assert_eq!(lines.len(), 11);
        assert_eq!(lines[0], " ");
        assert_eq!(lines[10], "á");
    }

    #[test]
    fn test_duration_json_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("duration.json");
        table().write_duration_map(&path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n    \"duration\""));
        let json: Value = serde_json::from_str(&text).unwrap();
        let map = json["duration"].as_object().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["f5_a.wav"].as_f64(), Some(2.0));
        assert_eq!(map["f5_b.wav"].as_f64(), Some(1.25));
    }

    #[test]
    fn test_save_to_disk_layout() {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().join("raw");
        let t = table();
        t.save_to_disk(&raw).unwrap();

        let state: Value =
            serde_json::from_str(&fs::read_to_string(raw.join("state.json")).unwrap()).unwrap();
        assert_eq!(state["_data_files"][0]["filename"], DATA_FILE);
        assert_eq!(state["_fingerprint"].as_str().unwrap().len(), 16);
        assert!(raw.join("dataset_info.json").is_file());

        let reader = StreamReader::try_new(File::open(raw.join(DATA_FILE)).unwrap(), None).unwrap();
        let batches: Vec<RecordBatch> = reader.map(|b| b.unwrap()).collect();
        assert_eq!(batches.len(), 1);
        let batch = &batches[0];
        assert_eq!(batch.num_rows(), 2);
        assert!(batch.schema().metadata().contains_key("huggingface"));

        let texts = batch
            .column_by_name("text")
            .unwrap()
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(texts.value(0), "olá mundo");
        let durations = batch
            .column_by_name("duration")
            .unwrap()
            .as_any()
            .downcast_ref::<Float64Array>()
            .unwrap();
        assert_eq!(durations.len(), 2);
        assert_eq!(durations.value(1), 1.25);
    }

    #[test]
    fn test_empty_table_still_writes() {
        let dir = tempfile::tempdir().unwrap();
        let t = DatasetTable::default();
        t.save_to_disk(&dir.path().join("raw")).unwrap();
        t.write_vocab(&dir.path().join("vocab.txt")).unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("vocab.txt")).unwrap(), "");
    }
}
