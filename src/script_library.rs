//! Event scripts and talk text, both loaded from indexed archives
//!
//! A script is a flat run of little-endian `i16` words; the record index is the
//! script id. Talk records are bit-inverted text with `*` separating display lines.

use crate::archive::{self, Record};
use byteorder::{ByteOrder, LittleEndian};
use log::info;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptLibrary {
    scripts: Vec<Vec<i16>>,
}

impl ScriptLibrary {
    pub fn from_records(records: &[Record]) -> Self {
        let scripts = records
            .iter()
            .map(|r| {
                let mut words = vec![0i16; r.len() / 2];
                LittleEndian::read_i16_into(&r[..words.len() * 2], &mut words);
                words
            })
            .collect();
        ScriptLibrary { scripts }
    }

    pub fn load(base: &Path) -> Result<Self, String> {
        let library = Self::from_records(&archive::load_base(base)?);
        info!("Loaded {} event scripts", library.len());
        Ok(library)
    }

    pub fn to_records(&self) -> Vec<Record> {
        self.scripts
            .iter()
            .map(|words| {
                let mut bytes = vec![0u8; words.len() * 2];
                LittleEndian::write_i16_into(words, &mut bytes);
                bytes
            })
            .collect()
    }

    /// Opcode stream for a script id
    pub fn get(&self, id: i16) -> Option<&[i16]> {
        usize::try_from(id)
            .ok()
            .and_then(|i| self.scripts.get(i))
            .map(|s| s.as_slice())
    }

    /// Install a script, growing the table with empty scripts as needed
    pub fn insert(&mut self, id: usize, words: Vec<i16>) {
        if self.scripts.len() <= id {
            self.scripts.resize(id + 1, Vec::new());
        }
        self.scripts[id] = words;
    }

    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TalkTable {
    talks: Vec<Record>,
}

impl TalkTable {
    pub fn from_records(talks: Vec<Record>) -> Self {
        TalkTable { talks }
    }

    pub fn load(base: &Path) -> Result<Self, String> {
        let talks = archive::load_base(base)?;
        info!("Loaded {} talk entries", talks.len());
        Ok(TalkTable { talks })
    }

    /// Encode plain text the way talk records store it
    pub fn encode(text: &str) -> Record {
        text.bytes().map(|b| !b).collect()
    }

    pub fn push(&mut self, text: &str) {
        self.talks.push(Self::encode(text));
    }

    /// Display lines of a talk entry; a missing entry yields a placeholder line
    pub fn lines(&self, id: i16) -> Vec<String> {
        let record = match usize::try_from(id).ok().and_then(|i| self.talks.get(i)) {
            Some(r) => r,
            None => return vec![format!("<talk {}>", id)],
        };
        let bytes: Vec<u8> = record
            .iter()
            .map(|b| !b)
            .take_while(|&b| b != 0)
            .collect();
        String::from_utf8_lossy(&bytes)
            .split('*')
            .map(|s| s.trim_end().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}
