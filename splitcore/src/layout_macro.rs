/// Create a layer of one half in keymap
#[macro_export]
macro_rules! layer {
    ([$([$($x: expr), +]), +]) => {
        [$([$($x), +]),+]
    };
}

/// Create a normal key. For example, `k!(A)` represents `KeyAction::Key(HidKeyCode::A)`
#[macro_export]
macro_rules! k {
    ($k: ident) => {
        $crate::types::action::KeyAction::Key($crate::types::keycode::HidKeyCode::$k)
    };
}

/// Create a normal action: `KeyAction`, `a!(No)` is an empty slot
#[macro_export]
macro_rules! a {
    ($a: ident) => {
        $crate::types::action::KeyAction::$a
    };
}

/// Create a command key. For example, `cmd!(LayerToggle)` represents `KeyAction::Command(Command::LayerToggle)`
#[macro_export]
macro_rules! cmd {
    ($c: ident) => {
        $crate::types::action::KeyAction::Command($crate::types::action::Command::$c)
    };
}
