fn main() {
    sycheck::cli::run();
}
