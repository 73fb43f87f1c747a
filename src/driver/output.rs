//! Human-readable run summary printed after the translated header.

use crate::symbols::SymbolTables;

/// Prints entity counts and per-interface signatures to stdout.
pub fn print_summary(tables: &SymbolTables) {
    println!("Number of enums: {}", tables.enums.len());
    for record in &tables.enums {
        println!(" {}", record.name);
    }
    println!();
    println!("Number of structs: {}", tables.structs.len());
    for record in &tables.structs {
        println!(" {}", record.name);
    }
    println!();
    println!("Number of interfaces: {}", tables.interfaces.len());
    println!();
    for (index, interface) in tables.interfaces.iter().enumerate() {
        println!("Interface {}: {}", index + 1, interface.name);
        println!("{}", interface.source_location);
        println!("Info: {}", interface.description.as_deref().unwrap_or("None"));
        println!("Methods:");
        for method in &interface.methods {
            println!(" {}", method.name);
        }
        println!();
    }
    println!();
}
