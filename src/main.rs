pub fn main() -> std::process::ExitCode {
    vqeconv::init::run()
}
