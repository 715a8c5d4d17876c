use anyhow::Result;
use s3_form_upload::UploadForm;
use std::env::args;

fn main() -> Result<()> {
    let mut args = args().skip(1);
    let object_key = args
        .next()
        .unwrap_or_else(|| "uploads/${filename}".to_owned());
    let redirect_url = args
        .next()
        .unwrap_or_else(|| "https://example.com/uploaded".to_owned());

    let form = UploadForm::builder(object_key, redirect_url).build();
    println!("{}", form.to_html()?);
    Ok(())
}
