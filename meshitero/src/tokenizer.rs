//! Adapters splitting text into morphemes.

use std::ffi::OsString;
use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::thread;

use crate::errors::{MeshiteroError, Result};

/// Sentinel record emitted by MeCab after each analyzed line.
const MECAB_EOS: &str = "EOS";

/// Morphological analyzer interface.
///
/// Implementations must be deterministic and must never return empty tokens.
pub trait Tokenizer {
    /// Splits a text into morphemes.
    ///
    /// # Arguments
    ///
    /// * `text` - A text to analyze.
    ///
    /// # Returns
    ///
    /// Morphemes in the order of appearance.
    ///
    /// # Errors
    ///
    /// When the underlying analyzer fails or emits a malformed record, an error variant will be
    /// returned.
    fn tokenize(&self, text: &str) -> Result<Vec<String>>;

    /// Splits several documents into one morpheme sequence.
    ///
    /// No morpheme spans two documents. The default implementation analyzes each document
    /// separately.
    fn tokenize_documents(&self, documents: &[&str]) -> Result<Vec<String>> {
        let mut morphemes = vec![];
        for document in documents {
            morphemes.append(&mut self.tokenize(document)?);
        }
        Ok(morphemes)
    }
}

impl<T> Tokenizer for &T
where
    T: Tokenizer + ?Sized,
{
    fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        (**self).tokenize(text)
    }

    fn tokenize_documents(&self, documents: &[&str]) -> Result<Vec<String>> {
        (**self).tokenize_documents(documents)
    }
}

impl<T> Tokenizer for Box<T>
where
    T: Tokenizer + ?Sized,
{
    fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        (**self).tokenize(text)
    }

    fn tokenize_documents(&self, documents: &[&str]) -> Result<Vec<String>> {
        (**self).tokenize_documents(documents)
    }
}

/// Tokenizer for pre-segmented text, where morphemes are separated by whitespace.
#[derive(Clone, Copy, Debug, Default)]
pub struct WhitespaceTokenizer;

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        Ok(text.split_whitespace().map(String::from).collect())
    }
}

/// Parses the default output format of MeCab.
///
/// Each record is `surface\tfeatures`. `EOS` sentinels and empty lines are skipped.
///
/// # Errors
///
/// If a line is neither a sentinel nor a two-field record, an error variant will be returned.
///
/// # Examples
///
/// ```
/// use meshitero::parse_mecab_output;
///
/// let output = "日本語\t名詞,一般\nが\t助詞,格助詞\n難しい\t形容詞,自立\nEOS\n";
/// assert_eq!(vec!["日本語", "が", "難しい"], parse_mecab_output(output).unwrap());
///
/// assert!(parse_mecab_output("日本語 名詞\nEOS\n").is_err());
/// ```
pub fn parse_mecab_output(output: &str) -> Result<Vec<String>> {
    let mut morphemes = vec![];
    for line in output.lines() {
        if line.is_empty() || line == MECAB_EOS {
            continue;
        }
        match line.split_once('\t') {
            Some((surface, _)) if !surface.is_empty() => morphemes.push(surface.to_string()),
            _ => return Err(MeshiteroError::malformed_analysis(line)),
        }
    }
    Ok(morphemes)
}

/// Tokenizer backed by the external `mecab` command.
///
/// The text is written to the standard input of the command and its standard output is parsed
/// with [`parse_mecab_output()`]. MeCab analyzes its input line by line, so documents passed to
/// [`Tokenizer::tokenize_documents()`] are analyzed in a single process run.
#[derive(Clone, Debug)]
pub struct MecabTokenizer {
    program: OsString,
    args: Vec<OsString>,
}

impl MecabTokenizer {
    /// Creates a new tokenizer running `mecab` from `PATH`.
    pub fn new() -> Self {
        Self {
            program: OsString::from("mecab"),
            args: vec![],
        }
    }

    /// Sets the program to run.
    pub fn program<S>(mut self, program: S) -> Self
    where
        S: Into<OsString>,
    {
        self.program = program.into();
        self
    }

    /// Appends an argument passed to the program, e.g. `-d /path/to/dic`.
    pub fn arg<S>(mut self, arg: S) -> Self
    where
        S: Into<OsString>,
    {
        self.args.push(arg.into());
        self
    }

    fn run(&self, input: String) -> Result<String> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| MeshiteroError::tokenizer("failed to open the standard input"))?;
        // Feeds the input from another thread so that a full stdout pipe cannot block us.
        let writer = thread::spawn(move || stdin.write_all(input.as_bytes()));

        let output = child.wait_with_output()?;
        let written = writer
            .join()
            .map_err(|_| MeshiteroError::tokenizer("writer thread panicked"))?;

        if !output.status.success() {
            return Err(MeshiteroError::tokenizer(format!(
                "{:?} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim_end(),
            )));
        }
        // The program may exit successfully without consuming all of its input.
        match written {
            Err(e) if e.kind() != io::ErrorKind::BrokenPipe => return Err(e.into()),
            _ => (),
        }
        String::from_utf8(output.stdout).map_err(|e| MeshiteroError::tokenizer(e.to_string()))
    }
}

impl Default for MecabTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer for MecabTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        let mut input = text.to_string();
        input.push('\n');
        parse_mecab_output(&self.run(input)?)
    }

    fn tokenize_documents(&self, documents: &[&str]) -> Result<Vec<String>> {
        if documents.is_empty() {
            return Ok(vec![]);
        }
        let mut input = documents.join("\n");
        input.push('\n');
        parse_mecab_output(&self.run(input)?)
    }
}

#[cfg(feature = "vaporetto")]
mod vaporetto_tokenizer {
    use std::fs::File;
    use std::path::Path;

    use meshitero_rules::{string_filters::FullwidthFilter, StringFilter};
    use vaporetto::{Model, Predictor, Sentence};

    use super::Tokenizer;
    use crate::errors::{MeshiteroError, Result};

    /// Tokenizer backed by a Vaporetto model.
    ///
    /// Input text is converted to full-width characters before prediction unless
    /// normalization is disabled, and the returned surfaces are those of the converted text.
    #[cfg_attr(docsrs, doc(cfg(feature = "vaporetto")))]
    pub struct VaporettoTokenizer {
        predictor: Predictor,
        normalize: bool,
    }

    impl VaporettoTokenizer {
        /// Creates a new tokenizer from a model.
        ///
        /// # Errors
        ///
        /// If the model is invalid, an error variant will be returned.
        pub fn new(model: Model) -> Result<Self> {
            let predictor =
                Predictor::new(model, false).map_err(|e| MeshiteroError::tokenizer(e.to_string()))?;
            Ok(Self {
                predictor,
                normalize: true,
            })
        }

        /// Loads a zstd-compressed model file.
        ///
        /// # Errors
        ///
        /// If the file cannot be read or the model is invalid, an error variant will be returned.
        pub fn from_path<P>(path: P) -> Result<Self>
        where
            P: AsRef<Path>,
        {
            let mut f = zstd::Decoder::new(File::open(path)?)?;
            let model = Model::read(&mut f).map_err(|e| MeshiteroError::tokenizer(e.to_string()))?;
            Self::new(model)
        }

        /// Enables or disables full-width normalization.
        pub fn normalize(mut self, normalize: bool) -> Self {
            self.normalize = normalize;
            self
        }
    }

    impl Tokenizer for VaporettoTokenizer {
        fn tokenize(&self, text: &str) -> Result<Vec<String>> {
            let mut morphemes = vec![];
            for line in text.lines() {
                if line.trim().is_empty() {
                    continue;
                }
                let line = if self.normalize {
                    FullwidthFilter.filter(line)
                } else {
                    line.to_string()
                };
                let mut s =
                    Sentence::from_raw(line).map_err(|e| MeshiteroError::tokenizer(e.to_string()))?;
                self.predictor.predict(&mut s);
                for token in s.iter_tokens() {
                    let surface = token.surface();
                    if !surface.trim().is_empty() {
                        morphemes.push(surface.to_string());
                    }
                }
            }
            Ok(morphemes)
        }
    }
}

#[cfg(feature = "vaporetto")]
pub use vaporetto_tokenizer::VaporettoTokenizer;
