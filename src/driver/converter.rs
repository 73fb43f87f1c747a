//! Conversion pipeline orchestration.
//!
//! Drives one run: preprocess the root header, parse the token stream into
//! the typed AST, collect declarations into the symbol tables, emit the
//! translated header, write it to the fixed output path and print it with
//! a human-readable summary. A run either fully completes or aborts before
//! any output is written.

use std::path::Path;

use crate::convert::collect;
use crate::driver::cli::ConvertConfig;
use crate::driver::output;
use crate::emit::emit_header;
use crate::error::Error;
use crate::logger::Logger;
use crate::parser::Parser;
use crate::pp::Preprocessor;
use crate::source::SourceMap;
use crate::symbols::SymbolTables;

/// The translated header is always written here.
pub const OUTPUT_FILE: &str = "vst3_c_api.h";

/// Main conversion driver.
pub struct Converter {
    config: ConvertConfig,
    logger: Logger,
    tables: SymbolTables,
}

impl Converter {
    pub fn new(config: ConvertConfig) -> Self {
        let logger = Logger::new(config.verbose);
        Converter {
            config,
            logger,
            tables: SymbolTables::new(),
        }
    }

    /// Runs the pipeline and returns the rendered header text.
    pub fn run(&mut self) -> Result<String, Error> {
        self.tables.clear();
        let mut sources = SourceMap::new();
        let unit = Preprocessor::new(&mut sources, &self.config.project_root)
            .process_root_file(&self.config.header)?;
        self.logger
            .log(&format!("preprocessed {} tokens", unit.tokens.len()));

        let ast = Parser::new(unit, &sources).parse()?;
        self.logger.log(&format!("parsed {} nodes", ast.nodes.len()));

        let root = self.config.project_root.to_string_lossy().to_string();
        collect(&ast, &sources, &root, &mut self.tables)?;
        self.logger.log(&format!(
            "collected {} interfaces, {} structs, {} enums",
            self.tables.interfaces.len(),
            self.tables.structs.len(),
            self.tables.enums.len()
        ));

        Ok(emit_header(&self.tables))
    }

    /// Runs the pipeline, writes the header to [`OUTPUT_FILE`] and prints
    /// the header plus the summary to stdout.
    pub fn run_and_write(&mut self) -> Result<(), Error> {
        let header = self.run()?;
        std::fs::write(OUTPUT_FILE, &header).map_err(|source| Error::Io {
            path: OUTPUT_FILE.to_string(),
            source,
        })?;
        print!("{}", header);
        output::print_summary(&self.tables);
        Ok(())
    }

    pub fn tables(&self) -> &SymbolTables {
        &self.tables
    }
}

/// Converts an in-memory header buffer, resolving includes against
/// `project_root`. Returns the populated tables and the rendered header.
pub fn convert_buffer(
    path: &Path,
    source: &str,
    project_root: &Path,
) -> Result<(SymbolTables, String), Error> {
    let mut sources = SourceMap::new();
    let unit = Preprocessor::new(&mut sources, project_root).process_root_buffer(path, source)?;
    let ast = Parser::new(unit, &sources).parse()?;
    let mut tables = SymbolTables::new();
    let root = project_root.to_string_lossy().to_string();
    collect(&ast, &sources, &root, &mut tables)?;
    let header = emit_header(&tables);
    Ok((tables, header))
}
