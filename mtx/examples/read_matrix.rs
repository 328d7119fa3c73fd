//! Read a .mtx file and print its header and a few entries

use std::time::Instant;

use mtx::{MtxFile, ReadOptions};

fn main() -> mtx::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let filename = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "example_matrix.mtx".to_string());

    if !std::path::Path::new(&filename).exists() {
        println!("File '{filename}' not found!");
        println!("   Run 'cargo run --example write_matrix' first");
        return Ok(());
    }

    let file = MtxFile::open(&filename)?;
    let header_json = serde_json::to_string_pretty(&file.header)
        .unwrap_or_else(|err| format!("<unserializable header: {err}>"));
    println!("Header:\n{header_json}");

    for threads in [1, 4] {
        let options = ReadOptions::default().with_num_threads(threads);
        let start = Instant::now();
        let (header, matrix) = file.read_triplet::<f64>(&options)?;
        let elapsed = start.elapsed();

        println!(
            "\n{threads} thread(s): {} entries ({} symmetry after read) in {:.3}ms",
            matrix.len(),
            header.symmetry,
            elapsed.as_secs_f64() * 1000.0
        );
        for (row, col, value) in matrix.iter().take(5) {
            println!("   matrix[{row}, {col}] = {value}");
        }
    }
    Ok(())
}
