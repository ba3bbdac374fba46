use json_catalog::{Catalog, CatalogConfig, NewProduct};

fn main() -> Result<(), json_catalog::Error> {
    let dir = std::env::temp_dir().join("json_catalog_example_live");
    let catalog = Catalog::open(&CatalogConfig::new(&dir))?;
    let events = catalog.broadcaster().subscribe();

    let listener = std::thread::spawn(move || {
        for event in events {
            // what a push channel would send to its clients
            match serde_json::to_string(&event) {
                Ok(json) => println!("push: {json}"),
                Err(e) => println!("can't encode event: {e}"),
            }
        }
    });

    let products = catalog.products();
    let p = products.create(NewProduct {
        title: Some("Keychain Denji".into()),
        description: Some("Keychain with a Chainsaw Man figure".into()),
        price: Some(2000.0),
        thumbnail: Some("no-image".into()),
        code: Some("st257".into()),
        stock: Some(52),
    })?;
    products.delete(p.id)?;

    // dropping the catalog drops the last sender and ends the listener
    drop(products);
    drop(catalog);
    let _ = listener.join();

    let _ = std::fs::remove_dir_all(&dir);
    Ok(())
}
