//! Baby Fun Box: the launcher with every game

use baby_fun_box::app;
use baby_fun_box::launcher::Mode;

fn main() -> anyhow::Result<()> {
    app::main(Mode::Launcher)
}
