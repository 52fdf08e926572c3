mod cli;
mod net;
mod report;
mod split;

use std::net::Ipv4Addr;
use std::path::Path;
use std::process;

use clap::Parser;
use colored::Colorize;

use cli::{Args, Command};
use net::Net;

fn main() {
    let progname = progname();
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                err.exit()
            }
            _ => usage(&progname),
        },
    };

    match run(&args) {
        Ok(()) => {}
        Err(net::Error::Usage) => usage(&progname),
        Err(err) => {
            eprintln!("{progname}: {err}");
            process::exit(1);
        }
    }
}

fn run(args: &Args) -> Result<(), net::Error> {
    match args.command()? {
        Command::Describe { net } => report::describe_address(&net, args.wildcard),
        Command::DescribeMask { prefix_len, mask } => {
            report::describe_mask(prefix_len, mask, args.wildcard)
        }
        Command::Find { start, end } => find(start, end, args.verbose, args.wildcard),
        Command::Split { net, capacities } => {
            split(&net, &capacities, args.verbose, args.wildcard)?
        }
    }
    Ok(())
}

fn find(start: Ipv4Addr, end: Ipv4Addr, verbose: bool, wildcard: bool) {
    for (i, block) in net::cover(start, end).enumerate() {
        if verbose {
            if i > 0 {
                println!();
            }
            report::describe_address(&block, wildcard);
        } else {
            println!("{block}");
        }
    }
}

fn split(
    network: &Net,
    capacities: &[u32],
    verbose: bool,
    wildcard: bool,
) -> Result<(), net::Error> {
    let plan = split::split_network(network, capacities)?;
    for (i, allocation) in plan.blocks.iter().enumerate() {
        if verbose {
            if i > 0 {
                println!();
            }
            println!(
                "you want a /{} to store {} IPs",
                allocation.net.prefix_len().to_string().green(),
                allocation.capacity.to_string().cyan()
            );
            report::describe_address(&allocation.net, wildcard);
        } else {
            println!("{}", allocation.net);
        }
    }
    // leftover space is only itemized in the full report
    if verbose {
        if let Some((first, last)) = plan.remainder {
            println!("\nremaining:");
            for block in net::cover(first, last) {
                println!("{block}");
            }
        }
    }
    Ok(())
}

fn progname() -> String {
    std::env::args()
        .next()
        .and_then(|arg0| {
            Path::new(&arg0)
                .file_name()
                .and_then(|name| name.to_str())
                .map(str::to_owned)
        })
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_owned())
}

fn usage(progname: &str) -> ! {
    eprintln!(
        "usage:\n \
         {0} [-c]           addr / mask    (describe network)\n \
         {0} [-c]  -n       mask           (describe mask)\n \
         {0} [-vc] -s list  addr / mask    (split network)\n \
         {0} [-vc] -r       addr : addr    (find networks)",
        progname
    );
    process::exit(1);
}
