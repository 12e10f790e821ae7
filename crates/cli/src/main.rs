use std::process::ExitCode;

fn main() -> ExitCode {
    coupon_cli::run()
}
