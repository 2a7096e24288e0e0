use anyhow::Result;

use crate::api::client::ApiClient;
use crate::api::users::{self, UserUpdate};
use crate::app::commands::{auth::print_user, flag, opt};

pub async fn list(client: &mut ApiClient) -> Result<()> {
    let users = users::list_users(client).await?;
    println!(
        "{:<6} {:<16} {:<28} {:<10} {:<6} {:<6}",
        "ID", "用户名", "邮箱", "姓名", "已审核", "已激活"
    );
    for user in &users {
        println!(
            "{:<6} {:<16} {:<28} {:<10} {:<6} {:<6}",
            user.id,
            user.username,
            user.email,
            opt(&user.real_name),
            flag(user.is_approved),
            flag(user.is_active),
        );
    }
    println!("共 {} 个用户", users.len());
    Ok(())
}

pub async fn show(client: &mut ApiClient, user_id: i64) -> Result<()> {
    let user = users::get_user(client, user_id).await?;
    print_user(&user);
    Ok(())
}

pub async fn update(client: &mut ApiClient, user_id: i64, update: UserUpdate) -> Result<()> {
    if update.is_empty() {
        println!("没有指定任何要修改的字段");
        return Ok(());
    }
    let user = users::update_user(client, user_id, &update).await?;
    println!("用户更新成功:");
    print_user(&user);
    Ok(())
}

pub async fn approve(client: &mut ApiClient, user_id: i64, approved: bool) -> Result<()> {
    let user = users::approve_user(client, user_id, approved).await?;
    if approved {
        println!("用户 {} 审核通过", user.username);
    } else {
        println!("用户 {} 审核已驳回", user.username);
    }
    Ok(())
}

pub async fn toggle(client: &mut ApiClient, user_id: i64) -> Result<()> {
    let resp = users::toggle_user_status(client, user_id).await?;
    println!("{}", resp.message);
    Ok(())
}

pub async fn delete(client: &mut ApiClient, user_id: i64) -> Result<()> {
    let resp = users::delete_user(client, user_id).await?;
    println!("{}", resp.message);
    Ok(())
}
