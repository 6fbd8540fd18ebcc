use galaxy::Galaxy;

fn main() {
    env_logger::init();

    if let Err(err) = Galaxy::new().run() {
        log::error!("{}", err);
        std::process::exit(1);
    }
}
