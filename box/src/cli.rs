use std::path::PathBuf;

use structopt::clap::AppSettings::*;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
pub enum Commands {
    #[structopt(name = "c", visible_alias = "create", about = "Create a new archive")]
    Create(CreateArgs),

    #[structopt(name = "l", visible_alias = "list", about = "List entries of an archive")]
    List(ListArgs),

    #[structopt(
        name = "x",
        visible_alias = "extract",
        about = "Extract entries of an archive"
    )]
    Extract(ExtractArgs),
}

#[derive(Debug, StructOpt)]
pub struct CreateArgs {
    #[structopt(
        short,
        long,
        parse(from_os_str),
        help = "Path of the .box archive to write [default: <stem of first file>.box]"
    )]
    pub output: Option<PathBuf>,

    #[structopt(short, long, help = "Overwrite the archive if it already exists")]
    pub force: bool,

    #[structopt(short, long, help = "Recursively handle provided directories")]
    pub recursive: bool,

    #[structopt(
        name = "files",
        parse(from_os_str),
        help = "Files to add to the archive, in order"
    )]
    pub files: Vec<PathBuf>,
}

#[derive(Debug, StructOpt)]
pub struct ListArgs {
    #[structopt(long, help = "Print entries as a JSON array")]
    pub json: bool,

    #[structopt(
        name = "boxfile",
        parse(from_os_str),
        help = "Path to the .box archive"
    )]
    pub path: PathBuf,
}

#[derive(Debug, StructOpt)]
pub struct ExtractArgs {
    #[structopt(
        short = "d",
        long = "directory",
        parse(from_os_str),
        help = "Directory to extract into [default: current directory]"
    )]
    pub output: Option<PathBuf>,

    #[structopt(
        name = "boxfile",
        parse(from_os_str),
        help = "Path to the .box archive"
    )]
    pub path: PathBuf,
}

#[derive(Debug, StructOpt)]
#[structopt(
    name = "lzbox",
    about = "Create, list and extract lzbox archives.",
    settings = &[SubcommandRequiredElseHelp, DisableHelpSubcommand, VersionlessSubcommands],
    usage = "lzbox (c|l|x) [FLAGS|OPTIONS] <boxfile|files>..."
)]
pub struct CliOpts {
    #[structopt(short, long, help = "Show verbose output", global = true)]
    pub verbose: bool,

    #[structopt(subcommand)]
    pub cmd: Commands,
}
