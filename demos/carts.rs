use json_catalog::{Cart, CartManager, CollectionStore};

fn main() -> Result<(), json_catalog::Error> {
    let path = std::env::temp_dir().join("json_catalog_example_carts.json");
    let _ = std::fs::remove_file(&path);
    let carts = CartManager::new(CollectionStore::<Cart>::open(&path));

    let cart = carts.create_cart()?;
    println!("new cart {}", cart.id);

    carts.add_product_to_cart(cart.id, 42)?;
    carts.add_product_to_cart(cart.id, 42)?;
    let cart = carts.add_product_to_cart(cart.id, 7)?;
    println!("lines = {:?}", cart.products);

    // unknown carts are an error
    println!("missing cart -> {:?}", carts.add_product_to_cart(1, 1));

    println!("on disk:\n{}", std::fs::read_to_string(&path)?);
    let _ = std::fs::remove_file(&path);
    Ok(())
}
