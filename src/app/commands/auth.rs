use anyhow::Result;

use crate::api::auth::{self, RegisterForm};
use crate::api::client::ApiClient;
use crate::api::users::User;
use crate::app::commands::{flag, opt};

pub async fn login(client: &mut ApiClient, username: &str, password: &str) -> Result<()> {
    let token = auth::login(client, username, password).await?;
    println!("登录成功，令牌已保存 ({})", token.token_type);
    Ok(())
}

pub async fn register(client: &mut ApiClient, form: RegisterForm) -> Result<()> {
    let user = auth::register(client, &form).await?;
    println!("注册成功: {} (id={})，等待管理员审核", user.username, user.id);
    Ok(())
}

pub async fn whoami(client: &mut ApiClient) -> Result<()> {
    if !client.session().is_authenticated() {
        println!("尚未登录，请先执行 auth login");
        return Ok(());
    }
    let user = auth::current_user(client).await?;
    print_user(&user);
    Ok(())
}

pub fn logout(client: &mut ApiClient) -> Result<()> {
    client.session_mut().clear()?;
    println!("已退出登录");
    Ok(())
}

pub(crate) fn print_user(user: &User) {
    println!("ID:       {}", user.id);
    println!("用户名:   {}", user.username);
    println!("邮箱:     {}", user.email);
    println!("姓名:     {}", opt(&user.real_name));
    println!("手机:     {}", opt(&user.phone));
    if let Some(age) = user.age {
        println!("年龄:     {age}");
    }
    println!("年级:     {}", opt(&user.grade));
    if let Some(province) = &user.province {
        println!("省份:     {}", province.name);
    }
    if let Some(city) = &user.city {
        println!("城市:     {}", city.name);
    }
    println!("已审核:   {}", flag(user.is_approved));
    println!("已激活:   {}", flag(user.is_active));
    if let Some(created) = &user.created_at {
        println!("注册时间: {created}");
    }
}
