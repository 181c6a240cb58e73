#[keyhold_derive::keyhold_slice]
pub struct Demo {
    pub name: String,
}

fn main() {
    let slice = Demo::new(DemoInner { name: "demo".to_owned() });
    assert_eq!(slice.name, "demo");

    let clone = slice.clone();
    assert_eq!(clone.name, slice.name);
}
