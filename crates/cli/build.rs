use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let path_arg = |arg: clap::Arg| arg.value_parser(clap::value_parser!(std::path::PathBuf));

    let mut cmd = clap::Command::new("chatscribe")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Chatscribe Contributors")
        .about("Convert saved AI-chat pages into clean Markdown notes")
        .arg(path_arg(clap::arg!(-f --file <FILE> "Single HTML file to process")))
        .arg(path_arg(clap::arg!(-b --batch <DIR> "Folder whose HTML files are all processed")))
        .arg(clap::arg!(-p --"full-page" "Export entire pages instead of searching for phrases"))
        .arg(
            clap::arg!(-s --search <PHRASE> "Phrase from the question to extract")
                .action(clap::ArgAction::Append),
        )
        .arg(clap::arg!(-m --merge <NAME> "Merge all extractions into this single .md file"))
        .arg(clap::arg!(-w --watch "Watch the downloads folder for new pages"))
        .arg(path_arg(clap::arg!(--downloads <DIR> "Override the downloads folder")))
        .arg(path_arg(clap::arg!(-o --"output-dir" <DIR> "Override the folder notes are saved to")))
        .arg(path_arg(clap::arg!(--config <FILE> "Configuration file")))
        .arg(clap::arg!(--debug "Enable debug logging"))
        .arg(path_arg(clap::arg!(--"log-file" <FILE> "Also append log lines to this file")));

    clap_complete::generate_to(clap_complete::shells::Bash, &mut cmd, "chatscribe", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Zsh, &mut cmd, "chatscribe", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Fish, &mut cmd, "chatscribe", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::PowerShell, &mut cmd, "chatscribe", &completions_dir).unwrap();

    println!(
        "cargo:warning=Shell completions generated in: {}",
        completions_dir.display()
    );
}
