/// Verbose mode surfaces each pipeline step; otherwise only warnings
/// and errors reach stderr.
pub fn init_logger(verbose: bool) {
    env_logger::Builder::new()
        .filter_level(if verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        })
        .init();
}
