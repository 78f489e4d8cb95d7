//! Drawing Pad on its own, without the launcher

use baby_fun_box::app;
use baby_fun_box::games::GameKind;

fn main() -> anyhow::Result<()> {
    app::main_standalone(GameKind::DrawingPad)
}
