mod logging;

use std::env;
use std::fs;
use std::path::Path;
use std::process;

use log::{error, info, warn};
use xml_comments::docs::xml_utils::{check_configuration, strip_doctype_system_id};
use xml_comments::docs::{CommentCollection, DocsError};
use xml_comments::settings::BuildSettings;

fn print_usage(program: &str) {
    eprintln!("Usage: {} <settings.json>", program);
    eprintln!("       {} check-config <configuration.xml>", program);
    eprintln!("  <settings.json>: Collect the comments files listed in the settings, convert");
    eprintln!("                   namespace placeholders and save the changed files");
    eprintln!("  check-config:    Check that a component configuration is well-formed XML");
    eprintln!("Example: {} F:\\build\\comments.json", program);
}

fn main() {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("check-config") if args.len() == 3 => process::exit(run_check_config(Path::new(&args[2]))),
        Some(settings_path) if args.len() == 2 => process::exit(run_build(Path::new(settings_path))),
        _ => {
            print_usage(args.first().map(String::as_str).unwrap_or("xml_comments"));
            process::exit(1);
        }
    }
}

fn run_check_config(path: &Path) -> i32 {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Failed to read {}: {}", path.display(), e);
            return 1;
        }
    };

    match check_configuration(&strip_doctype_system_id(&content)) {
        Ok(()) => {
            println!("{} is well-formed", path.display());
            0
        }
        Err(e) => {
            eprintln!("The XML configuration is not valid. Reason: {}", e);
            1
        }
    }
}

fn run_build(settings_path: &Path) -> i32 {
    let settings = match BuildSettings::load(settings_path) {
        Ok(settings) => settings,
        Err(e) => {
            // Logger isn't initialized yet
            eprintln!("{}", e);
            return 1;
        }
    };

    match logging::init_logger(settings.log_file.clone(), settings.log_level()) {
        Ok(path) => eprintln!("Logging to {}", path.display()),
        Err(e) => {
            eprintln!("Failed to initialize logger: {}", e);
            return 1;
        }
    }
    info!("Using settings from {}", settings_path.display());

    let mut collection = match CommentCollection::load(&settings.comment_files) {
        Ok(collection) => collection,
        Err(e) => {
            error!("Unable to build the comments file collection: {}", e);
            eprintln!("{}", e);
            return 1;
        }
    };

    collection.replace_namespace_doc_entries();

    let inherited = collection.contains_inherited_documentation();
    info!("Inherited documentation tool needed: {}", inherited);
    println!("Contains inherited documentation: {}", inherited);

    print!(
        "{}",
        collection.comment_file_list(&settings.working_folder, settings.for_inherited_docs)
    );

    for namespace in collection.referenced_namespaces(&settings.valid_namespaces) {
        println!("Referenced namespace: {}", namespace);
    }

    match collection.save() {
        Ok(()) => {
            info!("Comments files saved");
            0
        }
        Err(DocsError::Save { failures }) => {
            for failure in &failures {
                eprintln!("{}", failure);
            }
            warn!("{} comments file(s) could not be saved", failures.len());
            1
        }
        Err(e) => {
            error!("Saving comments files failed: {}", e);
            eprintln!("{}", e);
            1
        }
    }
}

