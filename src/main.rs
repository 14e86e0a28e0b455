fn main() -> std::process::ExitCode {
    emr_predict_lib::run()
}
