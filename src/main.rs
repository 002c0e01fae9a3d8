fn main() {
    lspgen::init_tracing();
    let code = lspgen::run_cli(std::env::args().collect());
    std::process::exit(code);
}
