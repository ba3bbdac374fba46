use json_catalog::{CollectionStore, NewProduct, Product, ProductManager, ProductPatch};

fn main() -> Result<(), json_catalog::Error> {
    let path = std::env::temp_dir().join("json_catalog_example_basic.json");
    let _ = std::fs::remove_file(&path);
    let products = ProductManager::new(CollectionStore::<Product>::open(&path));

    // create
    let input = NewProduct {
        title: Some("Keychain Gojo".into()),
        description: Some("Keychain with a Jujutsu Kaisen figure".into()),
        price: Some(2000.0),
        thumbnail: Some("no-image".into()),
        code: Some("st255".into()),
        stock: Some(133),
    };
    let gojo = products.create(input.clone())?;
    println!("created {gojo:?}");

    // duplicate codes are refused
    println!("duplicate -> {:?}", products.create(input));

    // so is anything with a blank field
    println!("blank -> {:?}", products.create(NewProduct::default()));

    // update in place, id stays put
    let updated = products.update(
        gojo.id,
        ProductPatch {
            id: Some(999),
            stock: Some(120),
            ..ProductPatch::default()
        },
    )?;
    println!("after update = {updated:?}");

    println!("first 10 = {:?}", products.list(Some(10)));
    println!("on disk:\n{}", std::fs::read_to_string(&path)?);

    products.delete(gojo.id)?;
    println!("after delete: get -> {:?}", products.get(gojo.id));

    let _ = std::fs::remove_file(&path);
    Ok(())
}
