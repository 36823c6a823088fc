fn main() {
    // Install panic handler.
    color_eyre::install().expect("Could not install panic handler");
    let args = std::env::args_os().collect();
    let exit_code = git_native::do_main_and_drop_locals(args).expect("A fatal error occurred");
    std::process::exit(exit_code);
}
