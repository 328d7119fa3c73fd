//! Write a random symmetric sparse matrix to a .mtx file

use std::time::Instant;

use mtx::{MatrixMarketHeader, MtxFile, SymmetryType, TripletMatrix, WriteOptions};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn main() -> mtx::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let n = 50_000;
    let nnz = 1_000_000;
    let filename = "example_matrix.mtx";

    println!("Building {n} x {n} symmetric matrix with {nnz} stored entries...");
    let start = Instant::now();
    let mut rng = StdRng::seed_from_u64(42);
    let mut matrix = TripletMatrix::with_capacity(n, n, nnz);
    for _ in 0..nnz {
        let row = rng.gen_range(0..n);
        let col = rng.gen_range(0..=row);
        matrix.push(row, col, rng.gen_range(-1.0..1.0f64));
    }
    println!("Built in {:?}", start.elapsed());

    let header = MatrixMarketHeader::default()
        .with_symmetry(SymmetryType::Symmetric)
        .with_comment("random lower triangle written by the mtx write_matrix example");
    let options = WriteOptions::default().with_num_threads(4);

    let start = Instant::now();
    MtxFile::write_triplet(filename, &header, &matrix, &options)?;
    println!("Written to '{filename}' in {:?}", start.elapsed());
    println!("\nRun 'cargo run --example read_matrix' to read it back!");
    Ok(())
}
