//! File I/O for .mtx files
//!
//! Reads map the file into memory when the `mmap` feature is enabled and
//! tokenize straight out of the mapping. Writes go through a buffered file,
//! or through tokio with the `async` feature.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use mtx_core::{Handler, MatrixMarketHeader, MatrixValue, PatternSubstitute};
use tracing::debug;

use crate::body::read_body;
use crate::containers::{DenseMatrix, TripletMatrix};
use crate::error::Result;
use crate::header_io::read_header;
use crate::options::{ReadOptions, WriteOptions};

/// File handle for .mtx files
#[derive(Debug, Clone)]
pub struct MtxFile {
    pub header: MatrixMarketHeader,
    pub path: PathBuf,
}

impl MtxFile {
    /// Open an existing file and read its header
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut reader = BufReader::new(File::open(&path)?);
        let header = read_header(&mut reader)?;
        Ok(Self { header, path })
    }

    /// Read the whole file into `handler`
    ///
    /// Returns the header as left by [`read_body`].
    pub fn read_into<H: Handler>(
        &self,
        handler: &mut H,
        substitute: PatternSubstitute<H::Value>,
        options: &ReadOptions,
    ) -> Result<MatrixMarketHeader> {
        let file = File::open(&self.path)?;

        #[cfg(feature = "mmap")]
        {
            let len = file.metadata()?.len();
            if len > 0 {
                // SAFETY: the mapping is read-only and dropped before returning
                let mmap = unsafe { memmap2::MmapOptions::new().map(&file)? };
                debug!(path = %self.path.display(), bytes = len, "Mapped Matrix Market file");
                let mut bytes: &[u8] = &mmap;
                return read_file(&mut bytes, handler, substitute, options);
            }
        }

        debug!(path = %self.path.display(), "Reading Matrix Market file");
        read_file(&mut BufReader::new(file), handler, substitute, options)
    }

    pub fn read_triplet<V: MatrixValue>(
        &self,
        options: &ReadOptions,
    ) -> Result<(MatrixMarketHeader, TripletMatrix<V>)> {
        let mut matrix = TripletMatrix::new(dim(self.header.nrows), dim(self.header.ncols));
        let header = self.read_into(&mut matrix, PatternSubstitute::default(), options)?;
        Ok((header, matrix))
    }

    pub fn read_dense<V: MatrixValue>(
        &self,
        options: &ReadOptions,
    ) -> Result<(MatrixMarketHeader, DenseMatrix<V>)> {
        let mut matrix = DenseMatrix::zeros(dim(self.header.nrows), dim(self.header.ncols))?;
        let header = self.read_into(&mut matrix, PatternSubstitute::default(), options)?;
        Ok((header, matrix))
    }

    /// Write a triplet matrix to `path`
    pub fn write_triplet<V: MatrixValue, P: AsRef<Path>>(
        path: P,
        header: &MatrixMarketHeader,
        matrix: &TripletMatrix<V>,
        options: &WriteOptions,
    ) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        matrix.write(&mut writer, header, options)?;
        writer.flush()?;
        debug!(path = %path.as_ref().display(), nnz = matrix.len(), "Wrote Matrix Market file");
        Ok(())
    }

    /// Write a dense matrix to `path` in array format
    pub fn write_dense<V: MatrixValue, P: AsRef<Path>>(
        path: P,
        header: &MatrixMarketHeader,
        matrix: &DenseMatrix<V>,
        options: &WriteOptions,
    ) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        matrix.write(&mut writer, header, options)?;
        writer.flush()?;
        Ok(())
    }

    /// Write a triplet matrix with tokio file I/O
    ///
    /// The text is formatted on the rayon pool described by `options`, then
    /// written in one pass.
    #[cfg(feature = "async")]
    pub async fn write_triplet_async<V: MatrixValue, P: AsRef<Path>>(
        path: P,
        header: &MatrixMarketHeader,
        matrix: &TripletMatrix<V>,
        options: &WriteOptions,
    ) -> Result<()> {
        use tokio::io::AsyncWriteExt;

        let mut text = Vec::new();
        matrix.write(&mut text, header, options)?;

        let mut file = tokio::fs::File::create(path.as_ref()).await?;
        file.write_all(&text).await?;
        file.flush().await?;

        debug!(
            path = %path.as_ref().display(),
            bytes = text.len(),
            "Wrote Matrix Market file"
        );
        Ok(())
    }
}

fn read_file<R: std::io::BufRead, H: Handler>(
    reader: &mut R,
    handler: &mut H,
    substitute: PatternSubstitute<H::Value>,
    options: &ReadOptions,
) -> Result<MatrixMarketHeader> {
    let mut header = read_header(reader)?;
    read_body(reader, &mut header, handler, substitute, options)?;
    Ok(header)
}

fn dim(n: i64) -> usize {
    usize::try_from(n).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mtx_core::{FieldType, SymmetryType};
    use tempfile::tempdir;

    fn sample() -> TripletMatrix<f64> {
        let mut matrix = TripletMatrix::new(5, 5);
        matrix.push(0, 0, 4.0);
        matrix.push(3, 1, -2.25);
        matrix.push(4, 4, 1e-12);
        matrix
    }

    #[test]
    fn test_write_open_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sample.mtx");
        let header = MatrixMarketHeader::default().with_comment("sample");

        MtxFile::write_triplet(&path, &header, &sample(), &WriteOptions::default()).unwrap();

        let file = MtxFile::open(&path).unwrap();
        assert_eq!(file.header.nnz, 3);
        assert_eq!(file.header.comment, "sample");

        let (_, matrix) = file.read_triplet::<f64>(&ReadOptions::default()).unwrap();
        assert_eq!(matrix, sample());

        let parallel = ReadOptions::default().with_num_threads(2).with_chunk_size_bytes(8);
        let (_, matrix) = file.read_triplet::<f64>(&parallel).unwrap();
        assert_eq!(matrix, sample());
    }

    #[test]
    fn test_dense_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dense.mtx");

        let mut dense = DenseMatrix::<i32>::zeros(2, 3).unwrap();
        dense.handle(1, 2, 9);
        MtxFile::write_dense(&path, &MatrixMarketHeader::default(), &dense, &WriteOptions::default())
            .unwrap();

        let file = MtxFile::open(&path).unwrap();
        assert_eq!(file.header.field, FieldType::Integer);
        let (_, read) = file.read_dense::<i32>(&ReadOptions::default()).unwrap();
        assert_eq!(read, dense);
    }

    #[test]
    fn test_symmetric_file_header_downgrade() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("symmetric.mtx");
        std::fs::write(
            &path,
            "%%MatrixMarket matrix coordinate pattern symmetric\n3 3 2\n2 1\n3 3\n",
        )
        .unwrap();

        let file = MtxFile::open(&path).unwrap();
        assert_eq!(file.header.symmetry, SymmetryType::Symmetric);

        let (header, matrix) = file.read_triplet::<f32>(&ReadOptions::default()).unwrap();
        assert_eq!(header.symmetry, SymmetryType::General);
        assert_eq!(
            matrix.iter().collect::<Vec<_>>(),
            vec![(1, 0, 1.0), (0, 1, 1.0), (2, 2, 1.0)]
        );
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let err = MtxFile::open(dir.path().join("absent.mtx")).unwrap_err();
        assert!(matches!(err, crate::Error::Io(_)));
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn test_async_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("async.mtx");
        let options = WriteOptions::default().with_num_threads(2).with_chunk_size_records(1);

        MtxFile::write_triplet_async(&path, &MatrixMarketHeader::default(), &sample(), &options)
            .await
            .unwrap();

        let (_, matrix) = MtxFile::open(&path)
            .unwrap()
            .read_triplet::<f64>(&ReadOptions::default())
            .unwrap();
        assert_eq!(matrix, sample());
    }
}
