use anyhow::Result;

use crate::api::client::ApiClient;
use crate::api::location;

pub async fn provinces(client: &mut ApiClient) -> Result<()> {
    let provinces = location::get_provinces(client).await?;
    println!("{:<6} {:<10} {:<8}", "ID", "省份", "编码");
    for province in &provinces {
        println!("{:<6} {:<10} {:<8}", province.id, province.name, province.code);
    }
    println!("共 {} 个省份", provinces.len());
    Ok(())
}

pub async fn cities(client: &mut ApiClient, province_id: i64) -> Result<()> {
    let cities = location::get_cities_by_province(client, province_id).await?;
    println!("{:<6} {:<12} {:<8}", "ID", "城市", "编码");
    for city in &cities {
        println!("{:<6} {:<12} {:<8}", city.id, city.name, city.code);
    }
    println!("共 {} 个城市", cities.len());
    Ok(())
}
