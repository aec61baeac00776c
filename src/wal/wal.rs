use crate::models::id::DocId;
use anyhow::{bail, Context, Result};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// WAL operation types
///
/// Variable-length string fields are hex-encoded so every record stays on a
/// single pipe-delimited line regardless of its content.
#[derive(Debug, Clone, PartialEq)]
pub enum WalOperation {
    PutUser {
        id: DocId,
        username: String,
        name: String,
        password_hash: String,
    },
    PutNote {
        id: DocId,
        content: String,
        important: bool,
        user: DocId,
    },
    RemoveNote {
        id: DocId,
    },
    LinkNote {
        user: DocId,
        note: DocId,
    },
}

fn encode_field(s: &str) -> String {
    hex::encode(s.as_bytes())
}

fn decode_field(s: &str) -> Result<String> {
    let bytes = hex::decode(s).context("Invalid hex field")?;
    String::from_utf8(bytes).context("Field is not valid UTF-8")
}

impl WalOperation {
    fn to_record(&self) -> String {
        match self {
            WalOperation::PutUser {
                id,
                username,
                name,
                password_hash,
            } => format!(
                "PUT_USER|{}|{}|{}|{}",
                id,
                encode_field(username),
                encode_field(name),
                encode_field(password_hash)
            ),
            WalOperation::PutNote {
                id,
                content,
                important,
                user,
            } => {
                let important_flag = if *important { "1" } else { "0" };
                format!(
                    "PUT_NOTE|{}|{}|{}|{}",
                    id,
                    encode_field(content),
                    important_flag,
                    user
                )
            }
            WalOperation::RemoveNote { id } => format!("REMOVE_NOTE|{}", id),
            WalOperation::LinkNote { user, note } => format!("LINK_NOTE|{}|{}", user, note),
        }
    }

    fn from_record(line: &str) -> Result<Self> {
        let parts: Vec<&str> = line.split('|').collect();

        match parts.first() {
            Some(&"PUT_USER") => {
                if parts.len() != 5 {
                    bail!("Invalid PUT_USER format");
                }
                let id = DocId::parse(parts[1]).context("Invalid user id")?;
                let username = decode_field(parts[2]).context("Invalid username")?;
                let name = decode_field(parts[3]).context("Invalid name")?;
                let password_hash = decode_field(parts[4]).context("Invalid password hash")?;

                Ok(WalOperation::PutUser {
                    id,
                    username,
                    name,
                    password_hash,
                })
            }
            Some(&"PUT_NOTE") => {
                if parts.len() != 5 {
                    bail!("Invalid PUT_NOTE format");
                }
                let id = DocId::parse(parts[1]).context("Invalid note id")?;
                let content = decode_field(parts[2]).context("Invalid content")?;
                let important = parts[3] == "1";
                let user = DocId::parse(parts[4]).context("Invalid owner id")?;

                Ok(WalOperation::PutNote {
                    id,
                    content,
                    important,
                    user,
                })
            }
            Some(&"REMOVE_NOTE") => {
                if parts.len() != 2 {
                    bail!("Invalid REMOVE_NOTE format");
                }
                let id = DocId::parse(parts[1]).context("Invalid note id")?;

                Ok(WalOperation::RemoveNote { id })
            }
            Some(&"LINK_NOTE") => {
                if parts.len() != 3 {
                    bail!("Invalid LINK_NOTE format");
                }
                let user = DocId::parse(parts[1]).context("Invalid user id")?;
                let note = DocId::parse(parts[2]).context("Invalid note id")?;

                Ok(WalOperation::LinkNote { user, note })
            }
            _ => bail!("Unknown operation type"),
        }
    }
}

pub struct Wal {
    file: Arc<Mutex<File>>,
    path: PathBuf,
}

impl Wal {
    pub fn new(path: PathBuf) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .context("Failed to open WAL file")?;

        Ok(Wal {
            file: Arc::new(Mutex::new(file)),
            path,
        })
    }

    pub fn log_operation(&self, op: WalOperation) -> Result<()> {
        let line = op.to_record();
        let mut file = self.file.lock().unwrap();
        writeln!(file, "{}", line).context("Failed to write to WAL")?;
        file.flush().context("Failed to flush WAL")?;
        Ok(())
    }

    pub fn replay(&self) -> Result<Vec<WalOperation>> {
        let file = File::open(&self.path).context("Failed to open WAL for replay")?;
        let reader = BufReader::new(file);
        let mut operations = Vec::new();

        for (line_num, line_result) in reader.lines().enumerate() {
            let line = line_result.context("Failed to read line from WAL")?;
            let line = line.trim();

            // Skip empty lines
            if line.is_empty() {
                continue;
            }

            match WalOperation::from_record(line) {
                Ok(op) => operations.push(op),
                Err(e) => {
                    tracing::warn!(
                        line_num = line_num + 1,
                        error = %e,
                        "Failed to parse WAL line, skipping"
                    );
                }
            }
        }

        Ok(operations)
    }

    pub fn truncate(&self) -> Result<()> {
        let mut file = self.file.lock().unwrap();
        file.set_len(0).context("Failed to truncate WAL")?;
        file.flush().context("Failed to flush WAL after truncate")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_wal_operation_serialization() {
        let user_id = DocId::generate();
        let note_id = DocId::generate();

        let op = WalOperation::PutUser {
            id: user_id,
            username: "admin".to_string(),
            name: "Admin Adminov".to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$abc$def".to_string(),
        };
        let serialized = op.to_record();
        assert!(serialized.starts_with(&format!("PUT_USER|{}|", user_id)));
        let deserialized = WalOperation::from_record(&serialized).unwrap();
        assert_eq!(op, deserialized);

        let op = WalOperation::PutNote {
            id: note_id,
            content: "a note with | pipes and ünïcode".to_string(),
            important: true,
            user: user_id,
        };
        let serialized = op.to_record();
        let deserialized = WalOperation::from_record(&serialized).unwrap();
        assert_eq!(op, deserialized);

        let op = WalOperation::RemoveNote { id: note_id };
        let serialized = op.to_record();
        assert_eq!(serialized, format!("REMOVE_NOTE|{}", note_id));
        let deserialized = WalOperation::from_record(&serialized).unwrap();
        assert_eq!(op, deserialized);

        let op = WalOperation::LinkNote {
            user: user_id,
            note: note_id,
        };
        let serialized = op.to_record();
        assert_eq!(serialized, format!("LINK_NOTE|{}|{}", user_id, note_id));
        let deserialized = WalOperation::from_record(&serialized).unwrap();
        assert_eq!(op, deserialized);
    }

    #[test]
    fn test_wal_log_and_replay() {
        let temp_dir = TempDir::new().unwrap();
        let wal_path = temp_dir.path().join("test.wal");

        let wal = Wal::new(wal_path.clone()).unwrap();

        let user_id = DocId::generate();
        let note_id = DocId::generate();

        wal.log_operation(WalOperation::PutUser {
            id: user_id,
            username: "admin".to_string(),
            name: "Admin Adminov".to_string(),
            password_hash: "hash".to_string(),
        })
        .unwrap();

        wal.log_operation(WalOperation::PutNote {
            id: note_id,
            content: "ezpzez".to_string(),
            important: false,
            user: user_id,
        })
        .unwrap();

        wal.log_operation(WalOperation::LinkNote {
            user: user_id,
            note: note_id,
        })
        .unwrap();

        wal.log_operation(WalOperation::RemoveNote { id: note_id })
            .unwrap();

        let operations = wal.replay().unwrap();
        assert_eq!(operations.len(), 4);

        match &operations[0] {
            WalOperation::PutUser { id, username, .. } => {
                assert_eq!(*id, user_id);
                assert_eq!(username, "admin");
            }
            _ => panic!("Expected PutUser"),
        }

        match &operations[1] {
            WalOperation::PutNote {
                id,
                content,
                important,
                user,
            } => {
                assert_eq!(*id, note_id);
                assert_eq!(content, "ezpzez");
                assert!(!important);
                assert_eq!(*user, user_id);
            }
            _ => panic!("Expected PutNote"),
        }

        match &operations[2] {
            WalOperation::LinkNote { user, note } => {
                assert_eq!(*user, user_id);
                assert_eq!(*note, note_id);
            }
            _ => panic!("Expected LinkNote"),
        }

        match &operations[3] {
            WalOperation::RemoveNote { id } => {
                assert_eq!(*id, note_id);
            }
            _ => panic!("Expected RemoveNote"),
        }
    }

    #[test]
    fn test_wal_truncate() {
        let temp_dir = TempDir::new().unwrap();
        let wal_path = temp_dir.path().join("test.wal");

        let wal = Wal::new(wal_path).unwrap();

        wal.log_operation(WalOperation::RemoveNote {
            id: DocId::generate(),
        })
        .unwrap();

        assert_eq!(wal.replay().unwrap().len(), 1);

        wal.truncate().unwrap();

        assert_eq!(wal.replay().unwrap().len(), 0);
    }

    #[test]
    fn test_wal_invalid_lines() {
        let temp_dir = TempDir::new().unwrap();
        let wal_path = temp_dir.path().join("test.wal");

        let id = DocId::generate();

        // Write an invalid line followed by a valid one
        fs::write(
            &wal_path,
            format!("INVALID_OP|data\nREMOVE_NOTE|{}\n", id),
        )
        .unwrap();

        let wal = Wal::new(wal_path).unwrap();
        let operations = wal.replay().unwrap();

        // Should skip the invalid line and parse the valid one
        assert_eq!(operations.len(), 1);
        assert_eq!(operations[0], WalOperation::RemoveNote { id });
    }
}
