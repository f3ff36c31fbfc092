//! Synthetic corpus generation
//!
//! Populates a working directory with ZIP archives of documents in the
//! format the pipeline consumes, for demos and soak testing.

use crate::config::CorpusConfig;
use crate::error::Result;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use rand::distr::Alphanumeric;
use rand::Rng;
use std::fs::{self, File};
use std::io::{self, Cursor, Write as IoWrite};
use std::path::Path;
use std::time::{Duration, Instant};
use uuid::Uuid;
use zip::write::{FileOptions, ZipWriter};

/// Level values are drawn from `1..=MAX_LEVEL`.
const MAX_LEVEL: u32 = 100;

/// Every document carries `1..=MAX_OBJECTS` object entries.
const MAX_OBJECTS: usize = 10;

const OBJECT_NAME_LEN: usize = 20;

#[derive(Debug, Clone)]
pub struct GenerationProgress {
    pub archives_written: usize,
    pub total_archives: usize,
    pub documents_written: usize,
    pub current_archive: Option<String>,
    pub start_time: Instant,
}

impl GenerationProgress {
    pub fn new(total_archives: usize) -> Self {
        Self {
            archives_written: 0,
            total_archives,
            documents_written: 0,
            current_archive: None,
            start_time: Instant::now(),
        }
    }

    pub fn update_archive(&mut self, name: String, documents: usize) {
        self.archives_written += 1;
        self.documents_written += documents;
        self.current_archive = Some(name);
    }

    pub fn percentage(&self) -> f64 {
        if self.total_archives == 0 {
            0.0
        } else {
            (self.archives_written as f64 / self.total_archives as f64) * 100.0
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

pub struct CorpusGenerator {
    archives: usize,
    documents_per_archive: usize,
}

impl CorpusGenerator {
    pub fn new(config: &CorpusConfig) -> Self {
        Self {
            archives: config.archives,
            documents_per_archive: config.documents_per_archive,
        }
    }

    /// Write the configured number of archives into `work_dir`, creating
    /// the directory if needed. Archives are named `000.zip`, `001.zip`,
    /// ... and their documents `000.xml`, `001.xml`, ...
    pub fn generate(
        &self,
        work_dir: &Path,
        progress_callback: Option<&dyn Fn(&GenerationProgress)>,
    ) -> Result<GenerationProgress> {
        let mut progress = GenerationProgress::new(self.archives);

        if !work_dir.exists() {
            fs::create_dir_all(work_dir)?;
        }

        let mut rng = rand::rng();

        for i in 0..self.archives {
            if let Some(callback) = progress_callback {
                callback(&progress);
            }

            let name = format!("{:03}.zip", i);
            let documents = self.write_archive(&work_dir.join(&name), &mut rng)?;
            progress.update_archive(name, documents);
        }

        if let Some(callback) = progress_callback {
            callback(&progress);
        }

        Ok(progress)
    }

    fn write_archive(&self, path: &Path, rng: &mut impl Rng) -> Result<usize> {
        let file = File::create(path)?;
        let mut zip = ZipWriter::new(file);
        let options: FileOptions<()> = FileOptions::default();

        for j in 0..self.documents_per_archive {
            let body = render_document(rng).map_err(|e| io::Error::other(e.to_string()))?;

            zip.start_file(format!("{:03}.xml", j), options)
                .map_err(io::Error::from)?;
            zip.write_all(body.as_bytes())?;
        }

        zip.finish().map_err(io::Error::from)?;
        Ok(self.documents_per_archive)
    }
}

/// Render one document with a fresh UUID id, a random level, and a random
/// set of object entries.
fn render_document(rng: &mut impl Rng) -> quick_xml::Result<String> {
    let id = Uuid::new_v4().to_string();
    let level = rng.random_range(1..=MAX_LEVEL).to_string();
    let object_count = rng.random_range(1..=MAX_OBJECTS);

    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new("root")))?;

    let mut id_var = BytesStart::new("var");
    id_var.push_attribute(("name", "id"));
    id_var.push_attribute(("value", id.as_str()));
    writer.write_event(Event::Empty(id_var))?;

    let mut level_var = BytesStart::new("var");
    level_var.push_attribute(("name", "level"));
    level_var.push_attribute(("value", level.as_str()));
    writer.write_event(Event::Empty(level_var))?;

    writer.write_event(Event::Start(BytesStart::new("objects")))?;
    for _ in 0..object_count {
        let name = random_object_name(rng);
        let mut object = BytesStart::new("object");
        object.push_attribute(("name", name.as_str()));
        writer.write_event(Event::Empty(object))?;
    }
    writer.write_event(Event::End(BytesEnd::new("objects")))?;
    writer.write_event(Event::End(BytesEnd::new("root")))?;

    let bytes = writer.into_inner().into_inner();
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn random_object_name(rng: &mut impl Rng) -> String {
    rng.sample_iter(&Alphanumeric)
        .take(OBJECT_NAME_LEN)
        .map(char::from)
        .collect()
}
