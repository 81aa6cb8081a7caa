//! Opening of model files.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;

use crate::errors::Result;

/// Opens a model file, decompressing it if the name ends with `.gz`.
pub fn open_model_file<P>(path: P) -> Result<Box<dyn Read>>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = BufReader::new(File::open(path)?);
    if path.extension().map_or(false, |ext| ext == "gz") {
        tracing::debug!(path = %path.display(), "reading gzip-compressed file");
        Ok(Box::new(GzDecoder::new(file)))
    } else {
        Ok(Box::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    use flate2::write::GzEncoder;
    use flate2::Compression;

    use crate::Vocabulary;

    const VOCAB_DATA: &str = "2 the 10\n3 house 4\n";

    #[test]
    fn test_open_plain_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(VOCAB_DATA.as_bytes()).unwrap();

        let vocab = Vocabulary::from_reader(open_model_file(file.path()).unwrap()).unwrap();
        assert_eq!(Some(3), vocab.id("house"));
    }

    #[test]
    fn test_open_gzip_file() {
        let file = tempfile::Builder::new().suffix(".gz").tempfile().unwrap();
        let mut encoder = GzEncoder::new(file.reopen().unwrap(), Compression::default());
        encoder.write_all(VOCAB_DATA.as_bytes()).unwrap();
        encoder.finish().unwrap();

        let vocab = Vocabulary::from_reader(open_model_file(file.path()).unwrap()).unwrap();
        assert_eq!(Some(2), vocab.id("the"));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            open_model_file("/nonexistent/model.gz"),
            Err(crate::HmmAlignError::Io(_))
        ));
    }
}
