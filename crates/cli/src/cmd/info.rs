use makegen_lib::platform::Platform;

pub fn cmd_info() {
  println!("makegen {}", env!("CARGO_PKG_VERSION"));
  match Platform::current() {
    Some(platform) => println!("Platform: {}", platform),
    None => println!("Could not detect platform."),
  }
}
