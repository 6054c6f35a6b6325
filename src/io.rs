use crate::model::Participant;
use anyhow::{bail, ensure, Context};
use csv::{ReaderBuilder, Trim};
use lettre::Address;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

/// Disposition des colonnes du fichier de participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowLayout {
    /// Première ligne = en-tête nommant les colonnes (`email`, `name`).
    #[default]
    Header,
    /// Pas d'en-tête : email en premier, nom en second.
    Positional,
}

/// Options de lecture du fichier de participants.
#[derive(Debug, Clone, Copy)]
pub struct ParticipantFormat {
    pub delimiter: u8,
    pub layout: RowLayout,
}

impl Default for ParticipantFormat {
    fn default() -> Self {
        Self {
            delimiter: b' ',
            layout: RowLayout::Header,
        }
    }
}

impl ParticipantFormat {
    /// Délimiteur donné sous forme de caractère (doit tenir sur un octet ASCII).
    pub fn with_delimiter(mut self, delimiter: char) -> anyhow::Result<Self> {
        ensure!(
            delimiter.is_ascii(),
            "delimiter must be a single ASCII character, got {delimiter:?}"
        );
        self.delimiter = delimiter as u8;
        Ok(self)
    }

    pub fn with_layout(mut self, layout: RowLayout) -> Self {
        self.layout = layout;
        self
    }
}

/// Import des participants depuis un fichier délimité.
pub fn import_participants<P: AsRef<Path>>(
    path: P,
    format: ParticipantFormat,
) -> anyhow::Result<Vec<Participant>> {
    let path = path.as_ref();
    info!(path = %path.display(), "loading santas");
    let file = File::open(path).with_context(|| format!("reading santas file {}", path.display()))?;
    read_participants(file, format).with_context(|| format!("parsing santas file {}", path.display()))
}

/// Même chose depuis n'importe quel lecteur (tests, stdin).
pub fn read_participants<R: Read>(
    reader: R,
    format: ParticipantFormat,
) -> anyhow::Result<Vec<Participant>> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(format.delimiter)
        .has_headers(format.layout == RowLayout::Header)
        .trim(Trim::All)
        .from_reader(reader);

    let mut out = Vec::new();
    match format.layout {
        RowLayout::Header => {
            for (idx, row) in rdr.deserialize::<Participant>().enumerate() {
                let row = row.with_context(|| format!("invalid santa row {}", idx + 2))?;
                out.push(row);
            }
        }
        RowLayout::Positional => {
            for (idx, rec) in rdr.records().enumerate() {
                let rec = rec.with_context(|| format!("invalid santa row {}", idx + 1))?;
                if rec.len() != 2 {
                    bail!(
                        "invalid santa row {}: expected 2 fields (email, name), got {}",
                        idx + 1,
                        rec.len()
                    );
                }
                out.push(Participant::new(&rec[0], &rec[1]));
            }
        }
    }

    validate_participants(&out)?;
    Ok(out)
}

fn validate_participants(participants: &[Participant]) -> anyhow::Result<()> {
    let mut names = HashSet::new();
    let mut emails = HashSet::new();
    for p in participants {
        if p.email.is_empty() || p.name.is_empty() {
            bail!("invalid santa row (empty field): {p:?}");
        }
        p.email
            .parse::<Address>()
            .with_context(|| format!("invalid email address for {}: {}", p.name, p.email))?;
        if !names.insert(p.name.as_str()) {
            bail!("duplicate santa name: {}", p.name);
        }
        if !emails.insert(p.email.to_ascii_lowercase()) {
            bail!("duplicate santa email: {}", p.email);
        }
    }
    Ok(())
}
