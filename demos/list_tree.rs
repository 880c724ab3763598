//! Connect to a printer and dump its SD card tree.
//!
//! Usage: cargo run --example list_tree -- <host> [password]

use rrfm::{FileManager, Filelist};

fn print_tree(fl: &Filelist, indent: usize) {
    for entry in &fl.files {
        let marker = if entry.is_dir() { "/" } else { "" };
        println!(
            "{:indent$}{}{}  {} bytes  {}",
            "",
            entry.name,
            marker,
            entry.size,
            entry.modified.format("%Y-%m-%d %H:%M:%S"),
        );
    }
    for sub in &fl.subdirs {
        println!("{:indent$}{}:", "", sub.dir);
        print_tree(sub, indent + 2);
    }
}

#[tokio::main]
async fn main() -> rrfm::Result<()> {
    let mut args = std::env::args().skip(1);
    let host = args.next().unwrap_or_else(|| "printer.local".to_string());
    let password = args.next().unwrap_or_else(|| "reprap".to_string());

    let fm = FileManager::new(&host, 80);
    fm.connect(&password).await?;

    let listing = fm.filelist("/gcodes", true).await?;
    println!("{}:", listing.dir);
    print_tree(&listing, 2);

    let probe = format!("{}/benchy.gcode", listing.dir);
    println!("\ncontains {}: {}", probe, listing.contains(&probe));

    Ok(())
}
